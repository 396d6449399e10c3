//! deckfx demo - run a generated loop through the effects pipeline
//!
//! Plays a filtered sawtooth riff through the engine while a control thread
//! sweeps the filter, bends pitch, and rocks the jog wheel, exercising the
//! lock-free control/audio split end to end.
//!
//! Run with: cargo run --bin deckfx-demo

use std::f32::consts::TAU;
use std::thread;
use std::time::Duration;

use color_eyre::eyre::{eyre, Result, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use deckfx::engine::events::fault_channel;
use deckfx::{Engine, EngineConfig, MAX_BLOCK_SIZE};

fn main() -> Result<()> {
    color_eyre::install()?;

    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| eyre!("no default output device available"))?;
    let config = device
        .default_output_config()
        .wrap_err("failed to fetch default output config")?;

    let sample_rate = config.sample_rate().0 as f32;
    let channels = config.channels() as usize;

    println!("=== deckfx demo ===");
    println!("Sample rate: {} Hz", sample_rate);
    println!("Channels: {}", channels);

    let mut engine = Engine::new(EngineConfig {
        sample_rate,
        ..EngineConfig::default()
    });
    let (tx, mut rx) = fault_channel(64);
    engine.set_event_sink(Box::new(tx));
    engine.prepare().wrap_err("engine setup failed")?;

    let params = engine.params();
    params.set_filter_cutoff(800.0);
    params.set_filter_resonance(2.0);
    params.set_flanger_enabled(true);
    params.set_flanger_rate(0.4);
    params.set_flanger_depth(0.8);
    params.set_volume(0.6);

    // Source: a bassy sawtooth two-note riff, generated in the callback.
    let mut phase = 0.0f32;
    let mut sample_count = 0u64;
    let mut mono = vec![0.0f32; MAX_BLOCK_SIZE];

    let stream = device.build_output_stream(
        &config.into(),
        move |data: &mut [f32], _| {
            let total_frames = data.len() / channels;
            let mut written = 0;

            while written < total_frames {
                let frames = (total_frames - written).min(MAX_BLOCK_SIZE);
                let block = &mut mono[..frames];

                for sample in block.iter_mut() {
                    let beat = (sample_count / (sample_rate as u64 / 2)) % 2;
                    let freq = if beat == 0 { 55.0 } else { 82.5 };
                    phase += freq / sample_rate;
                    if phase >= 1.0 {
                        phase -= 1.0;
                    }
                    *sample = 2.0 * phase - 1.0;
                    sample_count += 1;
                }

                engine.process_block(block, sample_rate);

                for (frame, &s) in block.iter().enumerate() {
                    let out = &mut data[(written + frame) * channels..][..channels];
                    out.fill(s);
                }
                written += frames;
            }
        },
        |err| eprintln!("stream error: {err}"),
        None,
    )?;
    stream.play()?;

    println!("Playing for 12 seconds; sweeping controls...");

    // Control side: arbitrary timing, no coordination with the callback.
    for step in 0..240 {
        let t = step as f32 / 240.0;

        let cutoff = 300.0 + 4_000.0 * (TAU * t * 2.0).sin().abs();
        params.set_filter_cutoff(cutoff);
        params.set_pitch_bend(3.0 * (TAU * t).sin());

        // A jog nudge in the last stretch: brake, spin back, release.
        if (0.75..0.85).contains(&t) {
            params.set_jog_position(-2.0);
        } else {
            params.set_jog_position(0.0);
        }

        while let Ok(fault) = rx.pop() {
            eprintln!("engine fault: {fault:?}");
        }
        thread::sleep(Duration::from_millis(50));
    }

    drop(stream);
    println!("Done.");
    Ok(())
}
