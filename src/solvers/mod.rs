pub mod influence;
pub mod panel;
pub mod thin_airfoil;
