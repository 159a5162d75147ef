// Purpose - getting audio out of the process: files now, devices in the binary

pub mod wav;

pub use wav::{read_wav, render, render_to_wav, write_wav};
