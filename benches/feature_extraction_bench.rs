//! Performance benchmarks for feature extraction

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use stratum_features::spectral::stft::compute_stft;
use stratum_features::{summarize, Waveform};

fn synthetic_waveform(seconds: usize) -> Waveform {
    let samples: Vec<f32> = (0..44100 * seconds)
        .map(|i| (i as f32 * 440.0 * 2.0 * std::f32::consts::PI / 44100.0).sin() * 0.5)
        .collect();
    Waveform::new(samples, 44100).expect("valid sample rate")
}

fn bench_summarize(c: &mut Criterion) {
    let waveform = synthetic_waveform(30);

    c.bench_function("summarize_30s", |b| {
        b.iter(|| summarize(black_box(&waveform)));
    });
}

fn bench_stft(c: &mut Criterion) {
    let waveform = synthetic_waveform(30);

    c.bench_function("stft_30s", |b| {
        b.iter(|| compute_stft(black_box(waveform.samples()), 44100, 2048, 512));
    });
}

criterion_group!(benches, bench_summarize, bench_stft);
criterion_main!(benches);
