pub mod artists;
pub mod home;
pub mod shows;
pub mod venues;
