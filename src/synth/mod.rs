// Purpose: Block orchestration of the voice model and the control channel
// feeding it from the control thread

pub mod controls;
pub mod message;
pub mod synthesizer;
