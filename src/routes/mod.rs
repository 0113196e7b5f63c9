pub mod exercises;
pub mod health;
pub mod recovery;
pub mod users;
pub mod workouts;
