//! Response synthesis
//!
//! Builds every bot reply: templated text plus the quick-reply options
//! offered with it. Mock values (wait estimates, queue numbers, confirmation
//! codes) come from an injected seedable RNG so a fixed seed yields exact,
//! reproducible text.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use ywait_config::constants::mock;
use ywait_config::domain::{
    ActiveQueue, BranchWaitTime, ACTIVE_QUEUES, AFTER_QUEUE_LEFT, AFTER_SMS_OPT_IN,
    APPOINTMENT_CONFIRMATION_ACTIONS, APPOINTMENT_SERVICES, BRANCH_OPTIONS, CALENDAR_OPT_IN,
    DATE_OPTIONS, LEARNING_TOPICS, LEAVE_QUEUE_OPTIONS, MORTGAGE_ACTIONS,
    PERSONAL_BANKING_ACTIONS, QUEUE_CONFIRMATION_ACTIONS, QUEUE_SERVICES, QUEUE_VIEW_ACTIONS,
    SMS_OPT_IN, TIME_SLOTS, TOP_LEVEL_MENU, WAIT_TIME_ACTIONS,
};
use ywait_core::BotReply;

const ANYTHING_ELSE: &str = "Is there anything else I can help you with?";
const ANYTHING_ELSE_TODAY: &str = "Is there anything else I can help you with today?";

/// Reply builder with an owned random source
#[derive(Debug, Clone)]
pub struct ResponseSynthesizer {
    rng: StdRng,
}

impl ResponseSynthesizer {
    /// Seeded synthesizer; `None` draws the seed from OS entropy
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(Some(seed))
    }

    // -- mock values -------------------------------------------------------

    /// Estimated queue wait in minutes
    pub fn wait_estimate(&mut self) -> u32 {
        self.rng
            .gen_range(mock::WAIT_ESTIMATE_MIN..=mock::WAIT_ESTIMATE_MAX)
    }

    /// Four-digit virtual queue ticket
    pub fn queue_number(&mut self) -> u32 {
        self.rng
            .gen_range(mock::QUEUE_NUMBER_MIN..=mock::QUEUE_NUMBER_MAX)
    }

    /// Appointment confirmation code, e.g. `BNK-48213`
    pub fn confirmation_code(&mut self) -> String {
        let n = self
            .rng
            .gen_range(mock::CONFIRMATION_CODE_MIN..=mock::CONFIRMATION_CODE_MAX);
        format!("{}{}", mock::CONFIRMATION_CODE_PREFIX, n)
    }

    // -- opening -----------------------------------------------------------

    pub fn greeting(&self, user_name: &str, brand: &str) -> BotReply {
        BotReply::with_options(
            format!(
                "Hello {user_name}! Welcome to {brand}. I'm your virtual assistant and I'll help you with all your banking needs.\n\n\
                 I can help you:\n\
                 1. Schedule a branch appointment\n\
                 2. Join a virtual queue to minimize wait time\n\
                 3. Check current branch wait times\n\
                 4. View your position in active queues\n\
                 5. Learn about our banking services\n\n\
                 How can I assist you today?"
            ),
            TOP_LEVEL_MENU,
        )
    }

    // -- greeting stage ----------------------------------------------------

    pub fn ask_appointment_service(&self) -> BotReply {
        BotReply::with_options(
            "I'll help you schedule a branch appointment. What type of banking service do you need?",
            APPOINTMENT_SERVICES,
        )
    }

    pub fn ask_wait_time_branch(&self) -> BotReply {
        BotReply::with_options(
            "I can help you check current wait times. Which branch location are you interested in?",
            BRANCH_OPTIONS,
        )
    }

    pub fn ask_queue_service(&self) -> BotReply {
        BotReply::with_options(
            "I can help you join a virtual queue. What banking service do you need today?",
            QUEUE_SERVICES,
        )
    }

    /// Fixed mock view of the user's active queues
    pub fn queue_positions(&self) -> BotReply {
        let entries = ACTIVE_QUEUES
            .iter()
            .enumerate()
            .map(|(i, q)| {
                format!(
                    "{}. {} at {}\n   Current position: {} of {}\n   Estimated wait time: {} minutes",
                    i + 1,
                    q.service,
                    q.branch,
                    q.position,
                    q.length,
                    q.wait_minutes
                )
            })
            .collect::<Vec<_>>()
            .join("\n   \n");

        BotReply::with_options(
            format!(
                "You are currently in the following queues:\n\n{entries}\n\n\
                 Would you like to:\n\
                 1. Receive SMS notifications for these queues\n\
                 2. Leave a queue\n\
                 3. Join another queue"
            ),
            QUEUE_VIEW_ACTIONS,
        )
    }

    pub fn service_overview(&self) -> BotReply {
        BotReply::with_options(
            "We offer a wide range of banking services including:\n\n\
             • Personal Banking: Checking, savings, credit cards, and personal loans\n\
             • Mortgage Services: Home loans, refinancing, and home equity lines\n\
             • Wealth Management: Investment advice, retirement planning, and estate planning\n\
             • Business Banking: Business accounts, merchant services, and commercial lending\n\n\
             Which service would you like to learn more about?",
            LEARNING_TOPICS,
        )
    }

    pub fn not_understood(&self) -> BotReply {
        BotReply::with_options(
            "I'm not sure I understood. As your banking assistant, I can help you schedule appointments, \
             join virtual queues, check wait times, view your queue positions, or learn about our services. \
             What would you like to do?",
            TOP_LEVEL_MENU,
        )
    }

    // -- slot collection ---------------------------------------------------

    pub fn ask_branch(&self, service: &str, queue_flow: bool) -> BotReply {
        let text = if queue_flow {
            format!("You've selected {service}. Which branch would you like to visit?")
        } else {
            format!(
                "Great! You've selected {service}. Which branch location would you prefer for your appointment?"
            )
        };
        BotReply::with_options(text, BRANCH_OPTIONS)
    }

    pub fn offer_queue(&self, service: &str, branch: &str, wait_minutes: u32) -> BotReply {
        BotReply::with_options(
            format!(
                "The current estimated wait time for {service} at {branch} is approximately {wait_minutes} minutes.\n\n\
                 Would you like to join the virtual queue? You'll receive updates about your position and can arrive just before your turn."
            ),
            QUEUE_CONFIRMATION_ACTIONS,
        )
    }

    pub fn ask_date(&self, branch: &str) -> BotReply {
        BotReply::with_options(
            format!("When would you like to schedule your appointment at {branch}?"),
            DATE_OPTIONS,
        )
    }

    pub fn ask_time(&self, date: &str) -> BotReply {
        BotReply::with_options(
            format!("What time would you prefer on {}?", date.to_lowercase()),
            TIME_SLOTS,
        )
    }

    pub fn review_appointment(
        &self,
        service: &str,
        branch: &str,
        date: &str,
        time: &str,
    ) -> BotReply {
        BotReply::with_options(
            format!(
                "Perfect! Let me confirm your appointment details:\n\n\
                 Service: {service}\n\
                 Branch: {branch}\n\
                 Date: {date}\n\
                 Time: {time}\n\n\
                 Would you like to confirm this appointment?"
            ),
            APPOINTMENT_CONFIRMATION_ACTIONS,
        )
    }

    // -- confirmation ------------------------------------------------------

    pub fn queue_joined(&self, service: &str, branch: &str, queue_number: u32) -> BotReply {
        BotReply::with_options(
            format!(
                "You've been added to the virtual queue for {service} at {branch}.\n\n\
                 Your queue number is: #{queue_number}\n\
                 Current position: {}\n\
                 Estimated wait time: {}\n\n\
                 You can track your position in real-time from the dashboard's \"Active Queues\" tab. \
                 I'll also send you notifications as your turn approaches.\n\n\
                 Would you like to receive SMS notifications about your position in the queue?",
                mock::JOINED_QUEUE_POSITION,
                mock::JOINED_QUEUE_WAIT
            ),
            SMS_OPT_IN,
        )
    }

    pub fn schedule_later(&self) -> BotReply {
        BotReply::with_options(
            "Let's schedule an appointment for later. When would you like to come in?",
            DATE_OPTIONS,
        )
    }

    pub fn queue_cancelled(&self) -> BotReply {
        BotReply::with_options(
            format!("I've cancelled the queue request. {ANYTHING_ELSE_TODAY}"),
            TOP_LEVEL_MENU,
        )
    }

    pub fn appointment_confirmed(&self, service: &str, code: &str) -> BotReply {
        BotReply::with_options(
            format!(
                "Great! Your appointment for {service} has been confirmed. \
                 You'll receive a confirmation email shortly with all the details.\n\n\
                 Your confirmation code is: {code}\n\n\
                 Please arrive 5 minutes before your scheduled time. \
                 Would you like to add this appointment to your calendar?"
            ),
            CALENDAR_OPT_IN,
        )
    }

    pub fn start_over(&self) -> BotReply {
        BotReply::with_options(
            "No problem! Let's start over. What type of banking service do you need?",
            APPOINTMENT_SERVICES,
        )
    }

    pub fn appointment_cancelled(&self) -> BotReply {
        BotReply::with_options(
            format!("I've cancelled the appointment process. {ANYTHING_ELSE_TODAY}"),
            TOP_LEVEL_MENU,
        )
    }

    // -- wait times --------------------------------------------------------

    pub fn branch_wait_time(&self, branch: &str, entry: &BranchWaitTime) -> BotReply {
        BotReply::with_options(
            format!(
                "Current wait time at {branch} is {} ({}).\n\n\
                 Would you like to:\n\
                 1. Join the virtual queue\n\
                 2. Schedule an appointment for later\n\
                 3. Find a branch with shorter wait times",
                entry.wait, entry.load
            ),
            WAIT_TIME_ACTIONS,
        )
    }

    // -- completed hub -----------------------------------------------------

    pub fn leave_queue_menu(&self) -> BotReply {
        let queues = ACTIVE_QUEUES
            .iter()
            .enumerate()
            .map(|(i, q)| format!("{}. {} at {}", i + 1, q.service, q.branch))
            .collect::<Vec<_>>()
            .join("\n");
        BotReply::with_options(
            format!("Which queue would you like to leave?\n\n{queues}"),
            LEAVE_QUEUE_OPTIONS,
        )
    }

    /// Acknowledge leaving `removed`; the user stays in `remaining`
    pub fn queue_left(&self, removed: &ActiveQueue, remaining: &ActiveQueue) -> BotReply {
        BotReply::with_options(
            format!(
                "You have been removed from the {} queue at {}.\n\n\
                 You are still in the {} queue at {} (position {}).\n\n\
                 {ANYTHING_ELSE}",
                removed.service,
                removed.branch,
                remaining.service,
                remaining.branch,
                remaining.position
            ),
            AFTER_QUEUE_LEFT,
        )
    }

    pub fn sms_enabled(&self) -> BotReply {
        BotReply::with_options(
            format!(
                "Great! We'll send SMS notifications as your turn approaches for both queues. \
                 You'll receive updates when:\n\n\
                 1. You move up in the queue\n\
                 2. You're 5 positions away\n\
                 3. You're next in line\n\
                 4. It's your turn\n\n\
                 {ANYTHING_ELSE}"
            ),
            AFTER_SMS_OPT_IN,
        )
    }

    pub fn calendar_sent(&self) -> BotReply {
        BotReply::text(format!(
            "I've sent a calendar invitation to your email. You'll receive it shortly.\n\n{ANYTHING_ELSE_TODAY}"
        ))
    }

    pub fn rejoin_queue(&self) -> BotReply {
        BotReply::with_options(
            "I'd be happy to help you join a virtual queue. What banking service do you need today?",
            QUEUE_SERVICES,
        )
    }

    pub fn rebook(&self) -> BotReply {
        BotReply::with_options(
            "I'd be happy to help you schedule an appointment. What type of banking service do you need?",
            APPOINTMENT_SERVICES,
        )
    }

    pub fn personal_banking(&self) -> BotReply {
        BotReply::with_options(
            "Our Personal Banking services include:\n\n\
             • Checking accounts with no monthly fees\n\
             • High-yield savings accounts\n\
             • Credit cards with competitive rewards\n\
             • Personal loans with flexible terms\n\
             • Mobile and online banking\n\n\
             Would you like to join a queue or schedule an appointment to discuss these services?",
            PERSONAL_BANKING_ACTIONS,
        )
    }

    pub fn mortgage_services(&self) -> BotReply {
        BotReply::with_options(
            "Our Mortgage Services include:\n\n\
             • Fixed and adjustable rate mortgages\n\
             • First-time homebuyer programs\n\
             • Refinancing options\n\
             • Home equity lines of credit\n\
             • Construction loans\n\n\
             Would you like to schedule a consultation with a mortgage specialist?",
            MORTGAGE_ACTIONS,
        )
    }

    pub fn continuation(&self) -> BotReply {
        BotReply::with_options(ANYTHING_ELSE_TODAY, TOP_LEVEL_MENU)
    }
}

impl Default for ResponseSynthesizer {
    fn default() -> Self {
        Self::new(None)
    }
}
