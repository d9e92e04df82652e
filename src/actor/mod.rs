pub(crate) mod cast;
pub(crate) mod draw;
pub(crate) mod model;

#[cfg(test)]
#[path = "../../tests/unit/actor/mod.rs"]
mod tests;
