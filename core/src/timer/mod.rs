//! Subathon countdown timer: arithmetic, reward lookup and export

pub mod codegen;
mod countdown;


pub use countdown::{
    Countdown, ENDED_LABEL, PERSIST_EVERY_SECS, RewardLookup, RewardRule, RewardUnit, STORE_KEY,
    end_label, format_hms,
};
