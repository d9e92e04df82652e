pub(crate) mod backend;
pub(crate) mod export;
pub(crate) mod raster;
pub(crate) mod recording;
pub(crate) mod svg;
