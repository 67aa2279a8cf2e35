use anyhow::{Context, bail};
use cpal::SampleFormat;
use cpal::traits::{DeviceTrait, StreamTrait};
use ringbuf::HeapProd;
use ringbuf::traits::Producer;

/// Live capture stream feeding the analysis pipeline.
///
/// The cpal callback downmixes interleaved frames to mono and pushes them
/// into the lock-free ring; the consumer half lives in the pipeline driver.
/// The stream only observes audio, it never alters playback. Dropping this
/// struct stops capture.
pub struct AudioCapture {
    _stream: cpal::Stream,
    pub sample_rate: u32,
    pub device_name: String,
}

impl AudioCapture {
    pub fn start(device: &cpal::Device, mut producer: HeapProd<f32>) -> anyhow::Result<Self> {
        let device_name = device.name().unwrap_or_else(|_| "unknown".to_string());
        let config = device
            .default_input_config()
            .with_context(|| format!("failed to get input config for {device_name}"))?;

        if config.sample_format() != SampleFormat::F32 {
            bail!("input device {device_name} doesn't support F32 samples");
        }

        let channels = config.channels() as usize;
        let sample_rate = config.sample_rate().0;

        // Reused across callbacks so the audio thread never allocates in
        // steady state.
        let mut mono: Vec<f32> = Vec::with_capacity(4096);

        let stream = device
            .build_input_stream(
                &config.into(),
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    mono.clear();
                    if channels <= 1 {
                        mono.extend_from_slice(data);
                    } else {
                        for frame in data.chunks_exact(channels) {
                            mono.push(frame.iter().sum::<f32>() / channels as f32);
                        }
                    }

                    let pushed = producer.push_slice(&mono);
                    if pushed < mono.len() {
                        // Consumer stalled; the ring keeps its backlog and we
                        // shed the newest excess.
                        log::debug!("capture ring full, dropped {} samples", mono.len() - pushed);
                    }
                },
                |err| log::warn!("input stream error: {err}"),
                None,
            )
            .with_context(|| format!("failed to build input stream on {device_name}"))?;

        stream
            .play()
            .with_context(|| format!("failed to start capture on {device_name}"))?;

        log::info!("audio capture started on {device_name} at {sample_rate} Hz");

        Ok(Self {
            _stream: stream,
            sample_rate,
            device_name,
        })
    }
}
