// The four-step guided flow: upload → preferences → search → results.

pub mod handlers;
pub mod service;
pub mod session;
pub mod views;
