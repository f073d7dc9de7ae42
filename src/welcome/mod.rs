//! Welcome greetings: the video artifact for a new member and its delivery to a chat channel.

pub(crate) mod artifact;
pub(crate) mod delivery;
