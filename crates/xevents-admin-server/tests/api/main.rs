mod health_check;
mod helpers;
mod login;
mod places;
mod resources;
mod users;
