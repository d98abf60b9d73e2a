pub mod camber;
pub mod generate;
pub mod presets;
