use core::time::Duration;
use std::{
    cell::{Cell, RefCell},
    rc::Rc,
    sync::{Arc, Barrier, mpsc},
    thread,
};

use crate::{
    CapsuleGate, Countdown, DurationBreakdown, DurationOptions, Elapsed, Instant, ManualClock,
    MIN_INTERVAL_MS, TickStatus, Ticker, TickerHandle,
};

fn at(input: &str) -> Instant {
    Instant::parse(input).unwrap()
}

fn elapsed_since(start: &str) -> Elapsed {
    Elapsed::new(at(start), DurationOptions::default())
}

#[test]
fn fires_once_on_start() {
    let clock = ManualClock::new(at("2024-01-01T00:00:05"));
    let readings = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&readings);

    let ticker = Ticker::start(clock, elapsed_since("2024-01-01"), 1000, move |d| {
        sink.borrow_mut().push(d);
    });

    assert_eq!(ticker.ticks(), 1);
    assert_eq!(readings.borrow().len(), 1);
    assert_eq!(readings.borrow()[0].seconds, 5);
}

#[test]
fn pending_until_interval_elapses() {
    let clock = ManualClock::new(at("2024-01-01T00:00:00"));
    let mut ticker = Ticker::start(clock.clone(), elapsed_since("2024-01-01"), 1000, |_| {});

    assert_eq!(ticker.poll().unwrap_pending(), Duration::from_millis(1000));

    clock.advance_millis(400);
    assert_eq!(ticker.poll().unwrap_pending(), Duration::from_millis(600));

    clock.advance_millis(600);
    assert!(ticker.poll().is_fired());
    assert_eq!(ticker.ticks(), 2);
    assert_eq!(ticker.poll().unwrap_pending(), Duration::from_millis(1000));
}

#[test]
fn one_tick_per_interval_in_order() {
    let clock = ManualClock::new(at("2024-01-01T00:00:00"));
    let seconds = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seconds);

    let mut ticker = Ticker::start(
        clock.clone(),
        elapsed_since("2024-01-01"),
        1000,
        move |d: DurationBreakdown| sink.borrow_mut().push(d.seconds),
    );

    for _ in 0..130 {
        clock.advance_millis(1000);
        assert_eq!(ticker.poll(), TickStatus::Fired);
        assert!(ticker.poll().unwrap_pending() > Duration::ZERO);
    }

    let seconds = seconds.borrow();
    assert_eq!(seconds.len(), 131);
    for (i, pair) in seconds.windows(2).enumerate() {
        assert_eq!(pair[1], (pair[0] + 1) % 60, "tick {i} -> {}", i + 1);
    }
}

#[test]
fn high_precision_cadence() {
    let clock = ManualClock::new(at("2024-01-01T00:00:00"));
    let millis = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&millis);

    let mut ticker = Ticker::start(
        clock.clone(),
        Elapsed::new(
            at("2024-01-01"),
            DurationOptions::default().with_milliseconds(),
        ),
        50,
        move |d: DurationBreakdown| sink.borrow_mut().push(d.milliseconds),
    );

    for _ in 0..3 {
        clock.advance_millis(50);
        assert!(ticker.poll().is_fired());
    }
    assert_eq!(*millis.borrow(), vec![Some(0), Some(50), Some(100), Some(150)]);
}

#[test]
fn no_ticks_after_stop() {
    let clock = ManualClock::new(at("2024-01-01T00:00:00"));
    let count = Rc::new(Cell::new(0));
    let counter = Rc::clone(&count);

    let mut ticker = Ticker::start(clock.clone(), elapsed_since("2024-01-01"), 1000, move |_| {
        counter.set(counter.get() + 1);
    });
    let handle = ticker.handle();

    clock.advance_millis(1000);
    assert!(ticker.poll().is_fired());
    assert_eq!(count.get(), 2);

    handle.stop();
    handle.stop();
    ticker.stop();

    for _ in 0..10 {
        clock.advance_millis(1000);
        assert!(ticker.poll().is_stopped());
    }
    assert_eq!(count.get(), 2);
    assert_eq!(ticker.ticks(), 2);
}

#[test]
fn stop_from_inside_callback() {
    let clock = ManualClock::new(at("2024-01-01T00:00:00"));
    let handle = TickerHandle::new();
    let stopper = handle.clone();
    let count = Rc::new(Cell::new(0));
    let counter = Rc::clone(&count);

    let mut ticker = Ticker::start_with(
        handle.clone(),
        clock.clone(),
        elapsed_since("2024-01-01"),
        1000,
        move |d: DurationBreakdown| {
            counter.set(counter.get() + 1);
            if d.seconds == 3 {
                stopper.stop();
            }
        },
    );

    for _ in 0..10 {
        clock.advance_millis(1000);
        ticker.poll();
    }

    assert_eq!(count.get(), 4);
    assert!(handle.is_stopped());
    assert!(ticker.handle().same_ticker(&handle));
}

#[test]
fn stopped_handle_never_fires() {
    let clock = ManualClock::new(at("2024-01-01T00:00:00"));
    let handle = TickerHandle::new();
    handle.stop();

    let count = Rc::new(Cell::new(0));
    let counter = Rc::clone(&count);
    let mut ticker = Ticker::start_with(handle, clock, elapsed_since("2024-01-01"), 1000, move |_| {
        counter.set(counter.get() + 1);
    });

    assert!(ticker.poll().is_stopped());
    assert_eq!(count.get(), 0);
}

#[test]
fn zero_interval_is_raised() {
    let clock = ManualClock::new(at("2024-01-01T00:00:00"));
    let mut ticker = Ticker::start(clock.clone(), elapsed_since("2024-01-01"), 0, |_| {});

    assert_eq!(ticker.interval_ms(), MIN_INTERVAL_MS);
    clock.advance_millis(MIN_INTERVAL_MS);
    assert!(ticker.poll().is_fired());
}

#[test]
fn falling_behind_reschedules_instead_of_bursting() {
    let clock = ManualClock::new(at("2024-01-01T00:00:00"));
    let mut ticker = Ticker::start(clock.clone(), elapsed_since("2024-01-01"), 1000, |_| {});

    clock.advance_millis(5_500);
    assert!(ticker.poll().is_fired());
    assert_eq!(ticker.next_due(), at("2024-01-01T00:00:06.500"));
    assert_eq!(ticker.poll().unwrap_pending(), Duration::from_millis(1000));

    // Slightly late ticks keep the original phase.
    clock.advance_millis(1_200);
    assert!(ticker.poll().is_fired());
    assert_eq!(ticker.next_due(), at("2024-01-01T00:00:07.500"));
}

#[test]
fn countdown_readout_opens_the_gate() {
    let clock = ManualClock::new(at("2024-06-01T11:59:57"));
    let gates = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&gates);

    let mut ticker = Ticker::start(
        clock.clone(),
        Countdown::new(at("2024-06-01T12:00:00")),
        1000,
        move |gate: CapsuleGate| sink.borrow_mut().push(gate),
    );

    for _ in 0..3 {
        clock.advance_millis(1000);
        ticker.poll();
    }

    let gates = gates.borrow();
    assert_eq!(gates.len(), 4);
    assert!(!gates[2].is_open());
    assert!(gates[3].is_open());
}

#[test]
fn closures_are_readouts() {
    let clock = ManualClock::new(at("2024-01-01T00:00:00"));
    let last = Rc::new(Cell::new(0));
    let sink = Rc::clone(&last);

    let mut ticker = Ticker::start(
        clock.clone(),
        |now: Instant| now.as_millis(),
        250,
        move |millis| sink.set(millis),
    );
    clock.advance_millis(250);
    ticker.poll();

    assert_eq!(last.get(), at("2024-01-01T00:00:00.250").as_millis());
}

#[test]
fn stop_waits_for_in_flight_callback() {
    let clock = ManualClock::new(at("2024-01-01T00:00:00"));
    let entered = Arc::new(Barrier::new(2));
    let (release_tx, release_rx) = mpsc::channel::<()>();
    let (done_tx, done_rx) = mpsc::channel::<&'static str>();
    let (started_tx, started_rx) = mpsc::channel::<()>();

    let handle = TickerHandle::new();
    let worker_handle = handle.clone();
    let worker_clock = clock.clone();
    let in_callback = Arc::clone(&entered);
    let callback_done = done_tx.clone();

    let worker = thread::spawn(move || {
        let mut first = true;
        let mut ticker = Ticker::start_with(
            worker_handle,
            worker_clock,
            elapsed_since("2024-01-01"),
            1000,
            move |_| {
                if first {
                    first = false;
                    return;
                }
                in_callback.wait();
                release_rx.recv().unwrap();
                callback_done.send("callback").unwrap();
            },
        );
        started_tx.send(()).unwrap();
        loop {
            match ticker.poll() {
                TickStatus::Pending { .. } => thread::yield_now(),
                status => break status,
            }
        }
    });

    // The first tick must be taken before the clock moves, or the second is
    // scheduled past anything this test advances to.
    started_rx.recv().unwrap();
    clock.advance_millis(1000);
    let stopper = thread::spawn(move || {
        entered.wait();
        handle.stop();
        done_tx.send("stop").unwrap();
    });

    // Give the stopper time to block on the gate before releasing.
    thread::sleep(Duration::from_millis(50));
    release_tx.send(()).unwrap();

    assert_eq!(done_rx.recv().unwrap(), "callback");
    assert_eq!(done_rx.recv().unwrap(), "stop");
    assert!(worker.join().unwrap().is_fired());
    stopper.join().unwrap();
}
