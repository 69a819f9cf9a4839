use super::ToneSink;
use super::oscillator::{ToneVoice, mix_voices};
use anyhow::{Result, anyhow};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Sample, SampleFormat, SizedSample, Stream, StreamConfig};
use crossbeam_channel::{Receiver, Sender, bounded, unbounded};
use std::sync::Mutex;
use std::thread::{self, JoinHandle};
use warmup_core::types::ToneShape;

/// Thread-safe handle to the audio output
///
/// The device is opened on the first emitted tone. The cpal stream lives on its
/// own thread; frequencies are handed to the audio callback over a channel and
/// each one becomes a decaying sine voice.
pub struct AudioPlayerHandle {
    shape: ToneShape,
    output: Mutex<Option<OutputThread>>,
}

impl AudioPlayerHandle {
    pub fn new(shape: ToneShape) -> Self {
        Self {
            shape,
            output: Mutex::new(None),
        }
    }

    /// Whether the output device has been opened
    pub fn is_open(&self) -> bool {
        self.output.lock().map(|o| o.is_some()).unwrap_or(false)
    }
}

impl ToneSink for AudioPlayerHandle {
    fn emit(&self, frequency: f32) -> Result<()> {
        let mut output = self
            .output
            .lock()
            .map_err(|e| anyhow!("Failed to lock audio output: {}", e))?;

        if output.is_none() {
            *output = Some(OutputThread::spawn(self.shape)?);
            log::info!("audio output opened");
        }

        match output.as_ref() {
            Some(thread) => thread
                .voice_tx
                .send(frequency)
                .map_err(|e| anyhow!("Audio output is gone: {}", e)),
            None => Err(anyhow!("No audio output")),
        }
    }
}

/// Owner of the thread that keeps the cpal stream alive
struct OutputThread {
    voice_tx: Sender<f32>,
    shutdown_tx: Option<Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl OutputThread {
    fn spawn(shape: ToneShape) -> Result<Self> {
        let (voice_tx, voice_rx) = unbounded();
        let (ready_tx, ready_rx) = bounded::<Result<()>>(1);
        let (shutdown_tx, shutdown_rx) = bounded::<()>(1);

        let thread = thread::Builder::new()
            .name("warmup-audio".to_string())
            .spawn(move || {
                let stream = match open_stream(voice_rx, shape) {
                    Ok(stream) => stream,
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };
                if let Err(e) = stream.play() {
                    let _ = ready_tx.send(Err(anyhow!("Failed to play stream: {}", e)));
                    return;
                }
                let _ = ready_tx.send(Ok(()));

                // Park until the handle goes away; dropping the stream closes the device
                let _ = shutdown_rx.recv();
                drop(stream);
            })?;

        ready_rx
            .recv()
            .map_err(|_| anyhow!("Audio thread exited during setup"))??;

        Ok(Self {
            voice_tx,
            shutdown_tx: Some(shutdown_tx),
            thread: Some(thread),
        })
    }
}

impl Drop for OutputThread {
    fn drop(&mut self) {
        self.shutdown_tx.take();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

fn open_stream(voice_rx: Receiver<f32>, shape: ToneShape) -> Result<Stream> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| anyhow!("No output device available"))?;
    let config = device.default_output_config()?;

    let sample_format = config.sample_format();
    let config: StreamConfig = config.into();
    log::debug!(
        "output device: {} Hz, {} channel(s), {:?}",
        config.sample_rate.0,
        config.channels,
        sample_format
    );

    match sample_format {
        SampleFormat::F32 => build_stream::<f32>(&device, &config, voice_rx, shape),
        SampleFormat::I16 => build_stream::<i16>(&device, &config, voice_rx, shape),
        SampleFormat::U16 => build_stream::<u16>(&device, &config, voice_rx, shape),
        _ => Err(anyhow!("Unsupported sample format: {:?}", sample_format)),
    }
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &StreamConfig,
    voice_rx: Receiver<f32>,
    shape: ToneShape,
) -> Result<Stream>
where
    T: Sample + SizedSample + Send + 'static + cpal::FromSample<f32>,
{
    let channels = config.channels as usize;
    let sample_rate = config.sample_rate.0 as f32;
    let mut voices: Vec<ToneVoice> = Vec::new();

    let err_fn = |err| log::error!("an error occurred on the output audio stream: {:?}", err);

    let stream = device
        .build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                for frequency in voice_rx.try_iter() {
                    voices.push(ToneVoice::new(frequency, sample_rate, shape));
                }

                for frame in data.chunks_mut(channels) {
                    let value: T = cpal::Sample::from_sample(mix_voices(&mut voices));
                    for sample in frame.iter_mut() {
                        *sample = value;
                    }
                }
            },
            err_fn,
            None,
        )
        .map_err(|e| anyhow!("Failed to build output stream: {}", e))?;

    Ok(stream)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_opens_lazily() {
        let handle = AudioPlayerHandle::new(ToneShape::default());
        assert!(!handle.is_open());
    }

    #[test]
    fn test_emit_on_real_device() {
        // This test may fail on systems without audio devices
        let handle = AudioPlayerHandle::new(ToneShape::default());
        match handle.emit(440.0) {
            Ok(()) => assert!(handle.is_open()),
            Err(_) => {
                // This is expected on systems without audio devices (like CI)
                println!("Audio output unavailable - likely no audio device");
            }
        }
    }
}
