pub mod linda;
