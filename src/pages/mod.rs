pub mod home;
pub mod mind_map;
pub mod not_found;
