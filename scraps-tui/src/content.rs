//! Static copy shown on the informational pages.

pub(crate) const APP_TITLE: &str = "Global Food Waste Tracker";

pub(crate) const TAGLINE: &str = "Track, Measure, and Reduce Your Food Waste!";

pub(crate) const INTRO: &str = "Food waste is one of the largest global problems today. \
With this app, you can track your food waste, get insights, and find ways to reduce it.";

pub(crate) const WELCOME: &str = "Welcome to the Global Food Waste Tracker!";

pub(crate) const WELCOME_BODY: [&str; 2] = [
    "This app is dedicated to reducing global food waste by helping you track and manage your food waste.",
    "Let's get started on reducing food waste today!",
];

pub(crate) const TIPS: [&str; 4] = [
    "Plan meals ahead of time to avoid excess food buying.",
    "Freeze leftovers or soon-to-expire food to extend shelf life.",
    "Use food scraps to make stock or compost.",
    "Store fruits and veggies properly to extend their shelf life.",
];

pub(crate) const DONATION_INTRO: [&str; 2] = [
    "Help your community by donating unused food to local food banks.",
    "Find the nearest donation centers in your area.",
];

// placeholder list until a real directory lookup exists
pub(crate) const DONATION_CENTERS: [&str; 3] = ["Food Bank A", "Food Bank B", "Community Shelter C"];
