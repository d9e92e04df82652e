pub(crate) mod ffmpeg;
pub(crate) mod sink;

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
