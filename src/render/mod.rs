pub(crate) mod blur;
pub(crate) mod composite;
pub(crate) mod frame;
pub mod layout;
pub(crate) mod text_layer;
