// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use kurbo::Point;
use understory_gesture::{
    Contact, ContactConfig, ContactId, GestureKind, ListenerOptions, PointerEvent, PointerListener,
};

#[derive(Clone)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u32(&mut self) -> u32 {
        // Numerical Recipes LCG parameters.
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 32) as u32
    }

    /// Uniform jitter in `[-amplitude, amplitude]`.
    fn jitter(&mut self, amplitude: f64) -> f64 {
        (f64::from(self.next_u32()) / f64::from(u32::MAX) * 2.0 - 1.0) * amplitude
    }
}

/// A noisy drag of one pointer, sampled every 8 ms.
fn drag(ticks: u32, seed: u64) -> Vec<PointerEvent> {
    let mut rng = Lcg::new(seed);
    let mut events = vec![PointerEvent::down(1, Point::ZERO, 0.0)];
    for i in 1..=ticks {
        let t = f64::from(i) * 8.0;
        let x = f64::from(i) * 3.0 + rng.jitter(0.5);
        let y = rng.jitter(0.5);
        events.push(PointerEvent::moved(1, Point::new(x, y), t));
    }
    let last = events[events.len() - 1];
    events.push(PointerEvent::up(1, last.position, last.timestamp + 8.0));
    events
}

/// Two pointers moving apart, interleaved the way platforms deliver them.
fn spread(ticks: u32, seed: u64) -> Vec<PointerEvent> {
    let mut rng = Lcg::new(seed);
    let mut events = vec![
        PointerEvent::down(1, Point::new(100.0, 100.0), 0.0),
        PointerEvent::down(2, Point::new(200.0, 100.0), 0.0),
    ];
    for i in 1..=ticks {
        let t = f64::from(i) * 8.0;
        let d = f64::from(i) * 2.0;
        events.push(PointerEvent::moved(
            1,
            Point::new(100.0 - d, 100.0 + rng.jitter(0.5)),
            t,
        ));
        events.push(PointerEvent::moved(
            2,
            Point::new(200.0 + d, 100.0 + rng.jitter(0.5)),
            t + 1.0,
        ));
    }
    let t = f64::from(ticks + 1) * 8.0;
    events.push(PointerEvent::up(1, Point::new(0.0, 100.0), t));
    events.push(PointerEvent::up(2, Point::new(300.0, 100.0), t));
    events
}

fn listener() -> PointerListener {
    let mut options = ListenerOptions::default();
    options.supported_gestures.push(GestureKind::Press);
    PointerListener::new(options).unwrap()
}

fn bench_gesture(c: &mut Criterion) {
    let mut group = c.benchmark_group("understory_gesture");
    group.sample_size(50);

    for &ticks in &[16_u32, 128_u32, 1_024_u32] {
        let stream = drag(ticks, 0x6E57_0000_0000_0001);
        group.bench_function(format!("contact_snapshot(ticks={ticks})"), |b| {
            b.iter(|| {
                let mut contact = Contact::new(ContactId(1), stream[0], ContactConfig::default());
                let mut sum = 0.0;
                for event in &stream[1..stream.len() - 1] {
                    contact.on_pointer_move(*event);
                    sum += contact.snapshot().primary.live.speed;
                }
                black_box(sum);
            });
        });

        group.bench_function(format!("listener_drag(ticks={ticks})"), |b| {
            b.iter_batched(
                listener,
                |mut listener| {
                    let mut fired = 0_usize;
                    for event in &stream {
                        fired += listener.handle(*event).len();
                    }
                    black_box(fired);
                },
                BatchSize::SmallInput,
            );
        });

        let stream = spread(ticks, 0x6E57_0000_0000_0002);
        group.bench_function(format!("listener_spread(ticks={ticks})"), |b| {
            b.iter_batched(
                listener,
                |mut listener| {
                    let mut fired = 0_usize;
                    for event in &stream {
                        fired += listener.handle(*event).len();
                    }
                    black_box(fired);
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_gesture);
criterion_main!(benches);
