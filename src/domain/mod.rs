// Domain layer: the contact message and the mail sender port. No transport code here.

pub mod model;
pub mod ports;
