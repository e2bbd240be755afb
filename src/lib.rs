pub mod pddl;
pub mod settings;
