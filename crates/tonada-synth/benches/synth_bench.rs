//! Benchmarks for the synthesis layer.

#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use tonada_core::SineTable;
use tonada_synth::{Envelope, Oscillator, VoiceBank, Waveform, midi_to_freq};

const SAMPLE_RATE: f32 = 22050.0;
const BLOCK: usize = 256;

fn bench_envelope(c: &mut Criterion) {
    c.bench_function("envelope_advance_block", |b| {
        let mut env = Envelope::new();
        env.gate_on();
        b.iter(|| {
            let mut acc = 0u32;
            for _ in 0..BLOCK {
                acc += u32::from(env.advance());
            }
            black_box(acc)
        });
    });
}

fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("oscillator");
    let table = SineTable::new();

    for waveform in [
        Waveform::Sine,
        Waveform::Square,
        Waveform::Sawtooth,
        Waveform::Triangle,
        Waveform::Noise,
    ] {
        group.bench_with_input(
            BenchmarkId::new("advance", format!("{waveform:?}")),
            &waveform,
            |b, &waveform| {
                let mut osc = Oscillator::new();
                osc.set_waveform(waveform);
                osc.set_frequency(440.0, SAMPLE_RATE);
                b.iter(|| {
                    let mut acc = 0i32;
                    for _ in 0..BLOCK {
                        acc += i32::from(osc.advance(&table, black_box(0.0)));
                    }
                    black_box(acc)
                });
            },
        );
    }

    group.finish();
}

fn bench_voice_bank(c: &mut Criterion) {
    let mut group = c.benchmark_group("voice_bank");
    let table = SineTable::new();

    for polyphony in [1usize, 4, 8] {
        group.bench_with_input(
            BenchmarkId::new("render", polyphony),
            &polyphony,
            |b, &polyphony| {
                let mut bank = VoiceBank::new(polyphony);
                for i in 0..polyphony {
                    bank.note_on(60 + i as u8, 100, SAMPLE_RATE);
                }
                b.iter(|| {
                    let mut acc = 0i64;
                    for _ in 0..BLOCK {
                        let (sum, _) = bank.render(&table, black_box(0.0), black_box(1.0));
                        acc += i64::from(sum);
                    }
                    black_box(acc)
                });
            },
        );
    }

    group.finish();
}

fn bench_midi_to_freq(c: &mut Criterion) {
    c.bench_function("midi_to_freq_sweep", |b| {
        b.iter(|| {
            let mut acc = 0.0f32;
            for note in 0u8..=127 {
                acc += midi_to_freq(black_box(note));
            }
            black_box(acc)
        });
    });
}

criterion_group!(
    benches,
    bench_envelope,
    bench_oscillator,
    bench_voice_bank,
    bench_midi_to_freq
);
criterion_main!(benches);
