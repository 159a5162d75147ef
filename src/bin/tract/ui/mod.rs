//! TUI module for tract
//!
//! Owns the articulation state on the control thread, publishes a control
//! snapshot every frame and visualizes what the audio thread sends back.

mod spectrum;
pub mod state;
mod status;
mod tract_view;
mod waveform;

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};
use rtrb::Consumer;
use std::time::{Duration, Instant};

use tract_dsp::{articulation::Articulator, synth::message::ControlPublisher, SynthConfig};

use spectrum::{render_spectrum, SpectrumAnalyzer};
use state::AudioStatus;
use status::{render_status, AudioStats, VoiceFlags};
use tract_view::render_tract;
use waveform::render_waveform;

/// Audio visualization buffer size (also the FFT size)
const VIS_BUFFER_SIZE: usize = 2048;

const CONSTRICTION_TOUCH: u32 = 1;
const NASAL_TOUCH: u32 = 2;

pub struct UiApp {
    articulator: Articulator,
    publisher: ControlPublisher,
    /// Ring buffer receiver for output samples
    audio_rx: Consumer<f32>,
    status_rx: Consumer<AudioStatus>,
    status: AudioStatus,
    audio_buffer: Vec<f32>,
    spectrum: SpectrumAnalyzer,
    /// Where a new constriction lands: (index, diameter)
    cursor: (f64, f64),
    started: Instant,
    should_quit: bool,
}

impl UiApp {
    pub fn new(
        config: SynthConfig,
        publisher: ControlPublisher,
        audio_rx: Consumer<f32>,
        status_rx: Consumer<AudioStatus>,
    ) -> Self {
        let articulator = Articulator::new(config.tract_segments);
        let cursor = (articulator.layout().tip_start as f64 + 4.0, 0.5);
        Self {
            articulator,
            publisher,
            audio_rx,
            status_rx,
            status: AudioStatus::default(),
            audio_buffer: vec![0.0; VIS_BUFFER_SIZE],
            spectrum: SpectrumAnalyzer::new(VIS_BUFFER_SIZE, config.sample_rate),
            cursor,
            started: Instant::now(),
            should_quit: false,
        }
    }

    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.poll_audio();
            self.poll_status();

            self.articulator.update(self.now());
            self.publisher.publish(self.articulator.snapshot());

            terminal.draw(|frame| self.render(frame))?;

            // Handle keyboard input (non-blocking, ~60fps)
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
        }

        Ok(())
    }

    fn now(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }

    fn poll_audio(&mut self) {
        let mut received = false;
        while let Ok(sample) = self.audio_rx.pop() {
            self.audio_buffer.push(sample);
            received = true;
        }

        if received {
            if self.audio_buffer.len() > VIS_BUFFER_SIZE {
                let excess = self.audio_buffer.len() - VIS_BUFFER_SIZE;
                self.audio_buffer.drain(0..excess);
            }
            self.spectrum.update(&self.audio_buffer);
        }
    }

    fn poll_status(&mut self) {
        while let Ok(status) = self.status_rx.pop() {
            self.status = status;
        }
    }

    fn nudge_pitch(&mut self, semitones: f64, vertical: f64) {
        let pitch = self.articulator.pitch_mut();
        let (semitone, t) = (pitch.semitone(), pitch.vertical());
        pitch.set(semitone + semitones, t + vertical);
    }

    fn handle_key(&mut self, key: KeyCode) {
        let now = self.now();
        let tongue = *self.articulator.tongue();

        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.should_quit = true,

            KeyCode::Char('v') => self.articulator.always_voice = !self.articulator.always_voice,
            KeyCode::Char('w') => self.articulator.auto_wobble = !self.articulator.auto_wobble,
            KeyCode::Char(' ') => {
                let pitch = self.articulator.pitch_mut();
                if pitch.is_touched() {
                    pitch.release();
                } else {
                    let (semitone, vertical) = (pitch.semitone(), pitch.vertical());
                    pitch.press(semitone, vertical);
                }
            }
            KeyCode::Char('[') => self.nudge_pitch(-1.0, 0.0),
            KeyCode::Char(']') => self.nudge_pitch(1.0, 0.0),
            KeyCode::Char('-') => self.nudge_pitch(0.0, -0.05),
            KeyCode::Char('=') => self.nudge_pitch(0.0, 0.05),

            KeyCode::Left => self.articulator.set_tongue(tongue.index - 0.5, tongue.diameter),
            KeyCode::Right => self.articulator.set_tongue(tongue.index + 0.5, tongue.diameter),
            KeyCode::Up => self.articulator.set_tongue(tongue.index, tongue.diameter + 0.1),
            KeyCode::Down => self.articulator.set_tongue(tongue.index, tongue.diameter - 0.1),

            KeyCode::Char('c') => {
                let held = self
                    .articulator
                    .touches()
                    .get(CONSTRICTION_TOUCH)
                    .is_some_and(|t| t.is_alive());
                if held {
                    self.articulator.release(CONSTRICTION_TOUCH, now);
                } else {
                    let (index, diameter) = self.cursor;
                    self.articulator.press(CONSTRICTION_TOUCH, index, diameter, now);
                }
            }
            KeyCode::Char('h') => self.move_cursor(-0.5, 0.0),
            KeyCode::Char('l') => self.move_cursor(0.5, 0.0),
            KeyCode::Char('j') => self.move_cursor(0.0, -0.05),
            KeyCode::Char('k') => self.move_cursor(0.0, 0.05),

            KeyCode::Char('n') => {
                let held = self
                    .articulator
                    .touches()
                    .get(NASAL_TOUCH)
                    .is_some_and(|t| t.is_alive());
                if held {
                    self.articulator.release(NASAL_TOUCH, now);
                } else {
                    let index = (self.articulator.layout().nose_start + 4) as f64;
                    self.articulator.press(NASAL_TOUCH, index, -1.0, now);
                }
            }
            _ => {}
        }
    }

    fn move_cursor(&mut self, d_index: f64, d_diameter: f64) {
        let n = self.articulator.layout().n as f64;
        self.cursor.0 = (self.cursor.0 + d_index).clamp(2.0, n - 1.0);
        self.cursor.1 = (self.cursor.1 + d_diameter).clamp(-0.5, 3.5);
        let (index, diameter) = self.cursor;
        self.articulator.move_touch(CONSTRICTION_TOUCH, index, diameter);
    }

    fn render(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Status bar
                Constraint::Min(10),   // Tract profile
                Constraint::Length(8), // Waveform
                Constraint::Length(8), // Spectrum
                Constraint::Length(1), // Help bar
            ])
            .split(frame.area());

        let flags = VoiceFlags {
            always_voice: self.articulator.always_voice,
            auto_wobble: self.articulator.auto_wobble,
            pitch_held: self.articulator.pitch().is_touched(),
        };
        let stats = AudioStats::from_buffer(&self.audio_buffer);
        let peak = self.spectrum.peak_frequency(60.0);
        render_status(frame, chunks[0], &self.status, &flags, &stats, peak);

        let snapshot = self.articulator.snapshot();
        let targets = snapshot.target_diameters();
        render_tract(frame, chunks[1], &self.status, targets, &self.articulator);

        render_waveform(frame, chunks[2], &self.audio_buffer);
        render_spectrum(frame, chunks[3], self.spectrum.data());

        let help = Paragraph::new(concat!(
            " [Q] Quit  [V] Voice  [W] Wobble  [Space] Hold pitch  [ ] Pitch  -= Tense",
            "  ←→↑↓ Tongue  [C] Constrict  HJKL Cursor  [N] Nasal",
        ))
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[4]);
    }
}
