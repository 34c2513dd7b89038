pub mod general_commissioning;
