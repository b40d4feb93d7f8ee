pub mod fs_loader;
pub mod logging;
pub mod script;

pub use fs_loader::FsSceneLoader;
pub use script::{Script, ScriptFrame, Segment};
