//! Melody generator
//!
//! Composes a 32-bar lead line over a one-note-per-bar tonic bass and
//! encodes both as a Standard MIDI File (format 1: a tempo track plus one
//! track per voice).
//!
//! The lead draws scale degrees uniformly from the genre's scale, with a
//! random duration per note and a velocity range that follows the mood.

use midly::{
    num::{u15, u24, u28, u4, u7},
    Format, Header, MetaMessage, MidiMessage, Smf, Timing, Track, TrackEvent, TrackEventKind,
};
use museai_common::{Customization, Error, Genre, Mood, Result, Style, Tempo};
use rand::Rng;

use crate::artifacts::{ArtifactKind, ArtifactStamp, ArtifactStore};
use crate::pick;

/// Ticks per quarter note in MIDI output.
pub const TICKS_PER_QUARTER: u16 = 480;

pub const BARS: u32 = 32;
pub const BEATS_PER_BAR: u32 = 4;

const LEAD_OCTAVE: u8 = 5;
const BASS_OCTAVE: u8 = 3;
const BASS_VELOCITY: u8 = 80;
const BASS_PROGRAM: u8 = 32;

const LEAD_CHANNEL: u8 = 0;
const BASS_CHANNEL: u8 = 1;

/// Lead note lengths in ticks: eighth, quarter, half
const LEAD_DURATIONS: [u32; 3] = [
    TICKS_PER_QUARTER as u32 / 2,
    TICKS_PER_QUARTER as u32,
    TICKS_PER_QUARTER as u32 * 2,
];

/// Scale intervals (semitones above the tonic) for a genre
pub fn scale(genre: Genre) -> &'static [u8] {
    const MAJOR: &[u8] = &[0, 2, 4, 5, 7, 9, 11];
    const MINOR: &[u8] = &[0, 2, 3, 5, 7, 8, 10];
    const DORIAN: &[u8] = &[0, 2, 3, 5, 7, 9, 10];
    const PENTATONIC: &[u8] = &[0, 2, 4, 7, 9];
    const MINOR_PENTATONIC: &[u8] = &[0, 3, 5, 7, 10];
    const BLUES: &[u8] = &[0, 3, 5, 6, 7, 10];

    match genre {
        Genre::Pop | Genre::Classical | Genre::Country => MAJOR,
        Genre::Rock => MINOR,
        Genre::Jazz => DORIAN,
        Genre::Electronic => PENTATONIC,
        Genre::HipHop => MINOR_PENTATONIC,
        Genre::Blues => BLUES,
    }
}

/// Beats per minute for a tempo class
pub fn bpm(tempo: Tempo) -> u32 {
    match tempo {
        Tempo::Slow => 60,
        Tempo::Medium | Tempo::Variable => 120,
        Tempo::Fast => 160,
    }
}

/// Inclusive lead velocity range for a mood
pub fn velocity_range(mood: Mood) -> (u8, u8) {
    match mood {
        Mood::Energetic | Mood::Happy | Mood::Uplifting => (90, 127),
        Mood::Calm | Mood::Sad => (60, 90),
        Mood::Romantic | Mood::Dark => (70, 100),
    }
}

/// General MIDI program for the lead voice
pub fn lead_program(style: Option<Style>) -> u8 {
    match style {
        Some(Style::Acoustic) => 24,   // nylon guitar
        Some(Style::Electric) => 27,   // clean electric guitar
        Some(Style::Orchestral) => 48, // string ensemble
        Some(Style::Synthetic) => 80,  // square lead
        Some(Style::Mixed) | None => 0, // acoustic grand piano
    }
}

/// One sounding note; times are in ticks from the start of the piece
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Note {
    pub pitch: u8,
    pub start: u32,
    pub duration: u32,
    pub velocity: u8,
}

/// A composed piece, ready for encoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Melody {
    pub tempo_bpm: u32,
    pub lead_program: u8,
    pub lead: Vec<Note>,
    pub bass: Vec<Note>,
}

/// Compose a melody for the customization
pub fn compose<R: Rng + ?Sized>(customization: &Customization, rng: &mut R) -> Melody {
    let degrees = scale(customization.genre);
    let root = customization.key.pitch_class();
    let (vel_lo, vel_hi) = velocity_range(customization.mood);

    let mut lead = Vec::with_capacity((BARS * BEATS_PER_BAR) as usize);
    let mut tick = 0u32;
    for _ in 0..BARS * BEATS_PER_BAR {
        let duration = *pick(rng, &LEAD_DURATIONS);
        lead.push(Note {
            pitch: root + pick(rng, degrees) + LEAD_OCTAVE * 12,
            start: tick,
            duration,
            velocity: rng.gen_range(vel_lo..=vel_hi),
        });
        tick += duration;
    }

    let bar_ticks = TICKS_PER_QUARTER as u32 * BEATS_PER_BAR;
    let bass = (0..BARS)
        .map(|bar| Note {
            pitch: root + BASS_OCTAVE * 12,
            start: bar * bar_ticks,
            duration: bar_ticks,
            velocity: BASS_VELOCITY,
        })
        .collect();

    Melody {
        tempo_bpm: bpm(customization.tempo),
        lead_program: lead_program(customization.style),
        lead,
        bass,
    }
}

/// Encode as a Standard MIDI File
pub fn encode(melody: &Melody) -> Result<Vec<u8>> {
    let smf = to_smf(melody);
    let mut buf = Vec::new();
    smf.write_std(&mut buf)
        .map_err(|e| Error::Encode(format!("MIDI write failed: {}", e)))?;
    Ok(buf)
}

/// Compose, encode and store a song; returns the artifact reference
pub fn generate<R: Rng + ?Sized>(
    customization: &Customization,
    rng: &mut R,
    store: &ArtifactStore,
    stamp: &ArtifactStamp,
) -> Result<String> {
    let bytes = encode(&compose(customization, rng))?;
    store.save(ArtifactKind::Song, customization.genre, stamp, &bytes)
}

fn to_smf(melody: &Melody) -> Smf<'static> {
    let mut smf = Smf::new(Header::new(
        Format::Parallel,
        Timing::Metrical(u15::new(TICKS_PER_QUARTER)),
    ));

    // Track 0: tempo track
    let tempo_microseconds = 60_000_000 / melody.tempo_bpm.max(1);
    smf.tracks.push(vec![
        TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::Tempo(u24::new(tempo_microseconds))),
        },
        TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
        },
    ]);

    smf.tracks.push(voice_track(
        b"Melody",
        LEAD_CHANNEL,
        melody.lead_program,
        &melody.lead,
    ));
    smf.tracks
        .push(voice_track(b"Bass", BASS_CHANNEL, BASS_PROGRAM, &melody.bass));
    smf
}

/// Notes must be in start order and must not overlap.
fn voice_track(name: &'static [u8], channel: u8, program: u8, notes: &[Note]) -> Track<'static> {
    let channel = u4::new(channel);
    let mut track: Track<'static> = Vec::with_capacity(notes.len() * 2 + 3);

    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::TrackName(name)),
    });
    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Midi {
            channel,
            message: MidiMessage::ProgramChange {
                program: u7::new(program),
            },
        },
    });

    let mut last_event_tick = 0u32;
    for note in notes {
        track.push(TrackEvent {
            delta: u28::new(note.start.saturating_sub(last_event_tick)),
            kind: TrackEventKind::Midi {
                channel,
                message: MidiMessage::NoteOn {
                    key: u7::new(note.pitch),
                    vel: u7::new(note.velocity),
                },
            },
        });
        track.push(TrackEvent {
            delta: u28::new(note.duration),
            kind: TrackEventKind::Midi {
                channel,
                message: MidiMessage::NoteOff {
                    key: u7::new(note.pitch),
                    vel: u7::new(0),
                },
            },
        });
        last_event_tick = note.start + note.duration;
    }

    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });
    track
}
