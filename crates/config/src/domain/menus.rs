//! Quick-reply option lists
//!
//! Every option string is resubmitted verbatim when chosen, so these lists
//! double as the vocabulary the keyword rules must route correctly.

/// Top-level menu offered on greeting, cancellation and continuation
pub const TOP_LEVEL_MENU: [&str; 5] = [
    "Schedule appointment",
    "Join virtual queue",
    "Check wait times",
    "View my queue position",
    "Learn about services",
];

/// Services that can be booked as an appointment
pub const APPOINTMENT_SERVICES: [&str; 4] = [
    "Account Services",
    "Loan/Mortgage Consultation",
    "Wealth Management",
    "Business Banking",
];

/// Services that have a walk-in virtual queue
pub const QUEUE_SERVICES: [&str; 4] = [
    "Account Services",
    "Teller Services",
    "Loan Inquiry",
    "Card Services",
];

pub const DATE_OPTIONS: [&str; 4] = ["Today", "Tomorrow", "This week", "Next week"];

pub const TIME_SLOTS: [&str; 5] = ["9:00 AM", "10:30 AM", "1:00 PM", "2:30 PM", "4:00 PM"];

pub const LEARNING_TOPICS: [&str; 4] = [
    "Personal Banking",
    "Mortgage Services",
    "Wealth Management",
    "Business Banking",
];

pub const QUEUE_VIEW_ACTIONS: [&str; 3] = [
    "Receive SMS notifications",
    "Leave a queue",
    "Join another queue",
];

pub const LEAVE_QUEUE_OPTIONS: [&str; 3] = [
    "Leave Account Services queue",
    "Leave Loan Inquiry queue",
    "Cancel",
];

pub const AFTER_QUEUE_LEFT: [&str; 3] = [
    "Join another queue",
    "Schedule appointment",
    "Check wait times",
];

pub const AFTER_SMS_OPT_IN: [&str; 3] = ["Join another queue", "Leave a queue", "No thanks"];

pub const QUEUE_CONFIRMATION_ACTIONS: [&str; 3] = ["Join queue", "Schedule for later", "Cancel"];

pub const APPOINTMENT_CONFIRMATION_ACTIONS: [&str; 3] =
    ["Confirm appointment", "Change details", "Cancel"];

pub const SMS_OPT_IN: [&str; 2] = ["Yes, send SMS", "No, just app notifications"];

pub const CALENDAR_OPT_IN: [&str; 2] = ["Add to calendar", "No thanks"];

pub const WAIT_TIME_ACTIONS: [&str; 3] = [
    "Join virtual queue",
    "Schedule appointment",
    "Find shorter wait",
];

pub const PERSONAL_BANKING_ACTIONS: [&str; 3] = [
    "Join queue for Personal Banking",
    "Schedule appointment",
    "Learn about other services",
];

pub const MORTGAGE_ACTIONS: [&str; 3] = [
    "Schedule mortgage consultation",
    "Join queue for loan inquiry",
    "Learn about other services",
];
