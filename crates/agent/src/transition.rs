//! Stage transition table
//!
//! `transition` maps (stage, slots, text) to the next stage, the updated
//! slots and the reply. It is flat and table-driven: each stage looks only at
//! its own input and the accumulated slots, never at older history. The
//! random source is injected through the [`ResponseSynthesizer`], so with a
//! seeded synthesizer the function is fully deterministic.
//!
//! Slot writes land before the reply is rendered (read-after-write).

use ywait_config::domain::{wait_time_for, ACTIVE_QUEUES};
use ywait_core::{BotReply, DialogueStage, Purpose, SlotKey, SlotStore};
use ywait_text_processing::{ConfirmationChoice, Intent, IntentClassifier};

use crate::response::ResponseSynthesizer;

/// Why a transition was taken
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionReason {
    /// A keyword rule matched in an open-ended stage
    IntentDetected(Intent),
    /// No keyword rule matched; fallback reply
    Unrecognized,
    /// Free text was stored positionally in a slot
    SlotFilled(SlotKey),
    /// Answer to a confirmation prompt
    Confirmation(ConfirmationChoice),
}

/// Result of one dialogue turn
#[derive(Debug, Clone)]
pub struct Transition {
    pub from: DialogueStage,
    pub to: DialogueStage,
    pub slots: SlotStore,
    pub reply: BotReply,
    pub reason: TransitionReason,
}

impl Transition {
    fn new(
        from: DialogueStage,
        to: DialogueStage,
        slots: SlotStore,
        reply: BotReply,
        reason: TransitionReason,
    ) -> Self {
        Self {
            from,
            to,
            slots,
            reply,
            reason,
        }
    }
}

/// Advance the dialogue by one user message
pub fn transition(
    stage: DialogueStage,
    slots: &SlotStore,
    text: &str,
    classifier: &IntentClassifier,
    synth: &mut ResponseSynthesizer,
) -> Transition {
    let result = match stage {
        DialogueStage::Greeting => on_greeting(slots, text, classifier, synth),
        DialogueStage::Service => on_service(slots, text, synth),
        DialogueStage::Branch => on_branch(slots, text, synth),
        DialogueStage::Date => on_date(slots, text, synth),
        DialogueStage::Time => on_time(slots, text, synth),
        DialogueStage::Confirmation => on_confirmation(slots, text, classifier, synth),
        DialogueStage::WaitTime => on_wait_time(slots, text, synth),
        DialogueStage::Completed => on_completed(slots, text, classifier, synth),
    };

    debug_assert!(
        result.from.can_transition_to(result.to),
        "undeclared edge {} -> {}",
        result.from,
        result.to
    );

    tracing::debug!(
        from = %result.from,
        to = %result.to,
        reason = ?result.reason,
        slots = result.slots.len(),
        "Stage transition"
    );

    result
}

fn on_greeting(
    slots: &SlotStore,
    text: &str,
    classifier: &IntentClassifier,
    synth: &mut ResponseSynthesizer,
) -> Transition {
    use DialogueStage::*;

    let intent = match classifier.classify_greeting(text) {
        Some(intent) => intent,
        None => {
            return Transition::new(
                Greeting,
                Greeting,
                slots.clone(),
                synth.not_understood(),
                TransitionReason::Unrecognized,
            )
        },
    };

    let reason = TransitionReason::IntentDetected(intent);
    match intent {
        Intent::BookAppointment => Transition::new(
            Greeting,
            Service,
            slots.clone(),
            synth.ask_appointment_service(),
            reason,
        ),
        Intent::CheckWaitTimes => Transition::new(
            Greeting,
            WaitTime,
            slots.clone(),
            synth.ask_wait_time_branch(),
            reason,
        ),
        Intent::JoinQueue => Transition::new(
            Greeting,
            Service,
            with_purpose(slots, Purpose::Queue),
            synth.ask_queue_service(),
            reason,
        ),
        Intent::ViewQueuePosition => Transition::new(
            Greeting,
            Completed,
            with_purpose(slots, Purpose::QueuePosition),
            synth.queue_positions(),
            reason,
        ),
        Intent::LearnServices => Transition::new(
            Greeting,
            Completed,
            with_purpose(slots, Purpose::Learn),
            synth.service_overview(),
            reason,
        ),
        // The greeting rule set never yields hub-only intents
        _ => Transition::new(
            Greeting,
            Greeting,
            slots.clone(),
            synth.not_understood(),
            TransitionReason::Unrecognized,
        ),
    }
}

fn on_service(slots: &SlotStore, text: &str, synth: &mut ResponseSynthesizer) -> Transition {
    let slots = with_slot(slots, SlotKey::Service, text);
    let reply = synth.ask_branch(slots.get_or_empty(SlotKey::Service), slots.is_queue_flow());
    Transition::new(
        DialogueStage::Service,
        DialogueStage::Branch,
        slots,
        reply,
        TransitionReason::SlotFilled(SlotKey::Service),
    )
}

fn on_branch(slots: &SlotStore, text: &str, synth: &mut ResponseSynthesizer) -> Transition {
    let slots = with_slot(slots, SlotKey::Branch, text);
    let branch = slots.get_or_empty(SlotKey::Branch);

    let (next, reply) = if slots.is_queue_flow() {
        let wait = synth.wait_estimate();
        let reply = synth.offer_queue(slots.get_or_empty(SlotKey::Service), branch, wait);
        (DialogueStage::Confirmation, reply)
    } else {
        (DialogueStage::Date, synth.ask_date(branch))
    };

    Transition::new(
        DialogueStage::Branch,
        next,
        slots,
        reply,
        TransitionReason::SlotFilled(SlotKey::Branch),
    )
}

fn on_date(slots: &SlotStore, text: &str, synth: &mut ResponseSynthesizer) -> Transition {
    let slots = with_slot(slots, SlotKey::Date, text);
    let reply = synth.ask_time(slots.get_or_empty(SlotKey::Date));
    Transition::new(
        DialogueStage::Date,
        DialogueStage::Time,
        slots,
        reply,
        TransitionReason::SlotFilled(SlotKey::Date),
    )
}

fn on_time(slots: &SlotStore, text: &str, synth: &mut ResponseSynthesizer) -> Transition {
    let slots = with_slot(slots, SlotKey::Time, text);
    let reply = synth.review_appointment(
        slots.get_or_empty(SlotKey::Service),
        slots.get_or_empty(SlotKey::Branch),
        slots.get_or_empty(SlotKey::Date),
        slots.get_or_empty(SlotKey::Time),
    );
    Transition::new(
        DialogueStage::Time,
        DialogueStage::Confirmation,
        slots,
        reply,
        TransitionReason::SlotFilled(SlotKey::Time),
    )
}

fn on_confirmation(
    slots: &SlotStore,
    text: &str,
    classifier: &IntentClassifier,
    synth: &mut ResponseSynthesizer,
) -> Transition {
    use DialogueStage::*;

    let service = slots.get_or_empty(SlotKey::Service);

    if slots.is_queue_flow() {
        let choice = classifier.queue_confirmation(text);
        let reason = TransitionReason::Confirmation(choice);
        return match choice {
            ConfirmationChoice::Accept => {
                let number = synth.queue_number();
                let reply =
                    synth.queue_joined(service, slots.get_or_empty(SlotKey::Branch), number);
                Transition::new(Confirmation, Completed, slots.clone(), reply, reason)
            },
            ConfirmationChoice::Defer => {
                Transition::new(Confirmation, Date, slots.clone(), synth.schedule_later(), reason)
            },
            ConfirmationChoice::Amend | ConfirmationChoice::Decline => Transition::new(
                Confirmation,
                Greeting,
                SlotStore::new(),
                synth.queue_cancelled(),
                reason,
            ),
        };
    }

    let choice = classifier.appointment_confirmation(text);
    let reason = TransitionReason::Confirmation(choice);
    match choice {
        ConfirmationChoice::Accept => {
            let code = synth.confirmation_code();
            let reply = synth.appointment_confirmed(service, &code);
            Transition::new(Confirmation, Completed, slots.clone(), reply, reason)
        },
        ConfirmationChoice::Amend => {
            Transition::new(Confirmation, Service, SlotStore::new(), synth.start_over(), reason)
        },
        ConfirmationChoice::Defer | ConfirmationChoice::Decline => Transition::new(
            Confirmation,
            Greeting,
            SlotStore::new(),
            synth.appointment_cancelled(),
            reason,
        ),
    }
}

fn on_wait_time(slots: &SlotStore, text: &str, synth: &mut ResponseSynthesizer) -> Transition {
    let slots = with_slot(slots, SlotKey::Branch, text);
    let branch = slots.get_or_empty(SlotKey::Branch);
    let reply = synth.branch_wait_time(branch, wait_time_for(branch));
    Transition::new(
        DialogueStage::WaitTime,
        DialogueStage::Completed,
        slots,
        reply,
        TransitionReason::SlotFilled(SlotKey::Branch),
    )
}

fn on_completed(
    slots: &SlotStore,
    text: &str,
    classifier: &IntentClassifier,
    synth: &mut ResponseSynthesizer,
) -> Transition {
    use DialogueStage::*;

    let [account_services, loan_inquiry] = &ACTIVE_QUEUES;

    let intent = match classifier.classify_completed(text) {
        Some(intent) => intent,
        None => {
            return Transition::new(
                Completed,
                Completed,
                slots.clone(),
                synth.continuation(),
                TransitionReason::Unrecognized,
            )
        },
    };

    let reason = TransitionReason::IntentDetected(intent);
    let stay = |reply: BotReply| Transition::new(Completed, Completed, slots.clone(), reply, reason);

    match intent {
        Intent::LeaveQueue => stay(synth.leave_queue_menu()),
        Intent::LeaveAccountServicesQueue => stay(synth.queue_left(account_services, loan_inquiry)),
        Intent::LeaveLoanInquiryQueue => stay(synth.queue_left(loan_inquiry, account_services)),
        Intent::SmsNotifications => stay(synth.sms_enabled()),
        Intent::AddToCalendar => stay(synth.calendar_sent()),
        Intent::JoinQueue => Transition::new(
            Completed,
            Service,
            SlotStore::with_purpose(Purpose::Queue),
            synth.rejoin_queue(),
            reason,
        ),
        Intent::BookAppointment => {
            Transition::new(Completed, Service, SlotStore::new(), synth.rebook(), reason)
        },
        Intent::PersonalBanking => stay(synth.personal_banking()),
        Intent::MortgageServices => stay(synth.mortgage_services()),
        // The hub rule set never yields greeting-only intents
        Intent::CheckWaitTimes | Intent::ViewQueuePosition | Intent::LearnServices => {
            stay(synth.continuation())
        },
    }
}

fn with_slot(slots: &SlotStore, key: SlotKey, value: &str) -> SlotStore {
    let mut next = slots.clone();
    next.set(key, value);
    next
}

fn with_purpose(slots: &SlotStore, purpose: Purpose) -> SlotStore {
    with_slot(slots, SlotKey::Purpose, purpose.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(stage: DialogueStage, slots: &SlotStore, text: &str) -> Transition {
        let classifier = IntentClassifier::new();
        let mut synth = ResponseSynthesizer::seeded(42);
        transition(stage, slots, text, &classifier, &mut synth)
    }

    fn queue_slots() -> SlotStore {
        let mut slots = SlotStore::with_purpose(Purpose::Queue);
        slots.set(SlotKey::Service, "Teller Services");
        slots.set(SlotKey::Branch, "Northgate Branch");
        slots
    }

    #[test]
    fn test_greeting_schedule_goes_to_service_without_purpose() {
        let t = run(DialogueStage::Greeting, &SlotStore::new(), "I want to schedule");
        assert_eq!(t.to, DialogueStage::Service);
        assert!(t.slots.purpose().is_none());
        assert!(t.reply.offers("Loan/Mortgage Consultation"));
    }

    #[test]
    fn test_greeting_join_sets_queue_purpose() {
        let t = run(DialogueStage::Greeting, &SlotStore::new(), "Join virtual queue");
        assert_eq!(t.to, DialogueStage::Service);
        assert!(t.slots.is_queue_flow());
        assert!(t.reply.offers("Teller Services"));
    }

    #[test]
    fn test_greeting_position_and_learn_go_to_hub() {
        let t = run(DialogueStage::Greeting, &SlotStore::new(), "View my queue position");
        assert_eq!(t.to, DialogueStage::Completed);
        assert_eq!(t.slots.purpose(), Some(Purpose::QueuePosition));
        assert!(t.reply.text.contains("Current position: 3 of 12"));

        let t = run(DialogueStage::Greeting, &SlotStore::new(), "learn");
        assert_eq!(t.to, DialogueStage::Completed);
        assert_eq!(t.slots.purpose(), Some(Purpose::Learn));
        assert!(t.reply.offers("Mortgage Services"));
    }

    #[test]
    fn test_greeting_fallback_restates_menu() {
        let t = run(DialogueStage::Greeting, &SlotStore::new(), "hello");
        assert_eq!(t.to, DialogueStage::Greeting);
        assert_eq!(t.reason, TransitionReason::Unrecognized);
        assert_eq!(t.reply.options.len(), 5);
    }

    #[test]
    fn test_service_stage_records_text_verbatim() {
        let t = run(DialogueStage::Service, &SlotStore::new(), "  odd Service ");
        assert_eq!(t.to, DialogueStage::Branch);
        assert_eq!(t.slots.get(SlotKey::Service), Some("  odd Service "));
        assert!(t.reply.text.contains("for your appointment"));

        let t = run(
            DialogueStage::Service,
            &SlotStore::with_purpose(Purpose::Queue),
            "Card Services",
        );
        assert_eq!(
            t.reply.text,
            "You've selected Card Services. Which branch would you like to visit?"
        );
    }

    #[test]
    fn test_branch_stage_routes_on_purpose() {
        let mut slots = SlotStore::new();
        slots.set(SlotKey::Service, "Account Services");
        let t = run(DialogueStage::Branch, &slots, "Eastside Branch");
        assert_eq!(t.to, DialogueStage::Date);
        assert!(t.reply.offers("Next week"));

        let mut slots = SlotStore::with_purpose(Purpose::Queue);
        slots.set(SlotKey::Service, "Loan Inquiry");
        let t = run(DialogueStage::Branch, &slots, "Eastside Branch");
        assert_eq!(t.to, DialogueStage::Confirmation);
        assert!(t
            .reply
            .text
            .starts_with("The current estimated wait time for Loan Inquiry at Eastside Branch"));
        assert!(t.reply.offers("Schedule for later"));
    }

    #[test]
    fn test_queue_confirmation_branches() {
        let t = run(DialogueStage::Confirmation, &queue_slots(), "Join queue");
        assert_eq!(t.to, DialogueStage::Completed);
        assert!(t.reply.text.contains("Teller Services at Northgate Branch"));
        assert!(t.reply.text.contains("Current position: 4 of 15"));

        let t = run(DialogueStage::Confirmation, &queue_slots(), "Schedule for later");
        assert_eq!(t.to, DialogueStage::Date);
        assert_eq!(t.slots, queue_slots());

        let t = run(DialogueStage::Confirmation, &queue_slots(), "no");
        assert_eq!(t.to, DialogueStage::Greeting);
        assert!(t.slots.is_empty());
    }

    #[test]
    fn test_appointment_confirmation_branches() {
        let mut slots = SlotStore::new();
        slots.set(SlotKey::Service, "Wealth Management");

        let t = run(DialogueStage::Confirmation, &slots, "Confirm appointment");
        assert_eq!(t.to, DialogueStage::Completed);
        assert!(t.reply.text.contains("Your appointment for Wealth Management"));
        assert!(t.reply.offers("Add to calendar"));

        let t = run(DialogueStage::Confirmation, &slots, "Change details");
        assert_eq!(t.to, DialogueStage::Service);
        assert!(t.slots.is_empty());

        let t = run(DialogueStage::Confirmation, &slots, "Cancel");
        assert_eq!(t.to, DialogueStage::Greeting);
        assert!(t.slots.is_empty());
    }

    #[test]
    fn test_wait_time_unknown_branch_uses_downtown() {
        let t = run(DialogueStage::WaitTime, &SlotStore::new(), "Uptown");
        assert_eq!(t.to, DialogueStage::Completed);
        assert!(t
            .reply
            .text
            .starts_with("Current wait time at Uptown is 15-20 minutes (moderate)."));
    }

    #[test]
    fn test_completed_hub_reentry_resets_slots() {
        let t = run(DialogueStage::Completed, &queue_slots(), "Join another queue");
        assert_eq!(t.to, DialogueStage::Service);
        assert_eq!(t.slots, SlotStore::with_purpose(Purpose::Queue));

        let t = run(DialogueStage::Completed, &queue_slots(), "Schedule appointment");
        assert_eq!(t.to, DialogueStage::Service);
        assert!(t.slots.is_empty());
    }

    #[test]
    fn test_completed_hub_stays_put() {
        for text in ["Leave a queue", "1", "2", "sms", "Add to calendar", "savings", "home", "?"] {
            let t = run(DialogueStage::Completed, &queue_slots(), text);
            assert_eq!(t.to, DialogueStage::Completed, "input {text:?}");
            assert_eq!(t.slots, queue_slots());
        }
    }

    #[test]
    fn test_every_edge_is_declared() {
        let inputs = ["", "yes", "no", "join", "schedule", "leave queue", "Westside", "y"];
        for stage in DialogueStage::ALL {
            for text in inputs {
                let t = run(stage, &queue_slots(), text);
                assert!(stage.can_transition_to(t.to), "{stage} -> {}", t.to);
            }
        }
    }
}
