pub mod fetch_use_case;
pub mod ports;
pub mod submit_use_case;
