#![no_main]

use libfuzzer_sys::fuzz_target;
use workout_clock::clock::{Exercise, initial_state_with_lead_in, tick};
use workout_clock::driver::total_ticks;

// Each 4-byte chunk after the first byte is one exercise:
// work, rest, sets, intermediate offset.
fuzz_target!(|data: &[u8]| {
    let Some((&lead_in, rest)) = data.split_first() else {
        return;
    };
    let exercises: Vec<Exercise> = rest
        .chunks_exact(4)
        .take(16)
        .enumerate()
        .map(|(i, c)| {
            Exercise::new(
                format!("E{i}"),
                u32::from(c[0]).max(1),
                u32::from(c[1]),
                u32::from(c[2] % 8).max(1),
            )
            .with_beeps([u32::from(c[3])])
        })
        .collect();

    let lead_in = u32::from(lead_in).max(1);
    let expected = total_ticks(&exercises, lead_in);
    let mut state = initial_state_with_lead_in(&exercises, lead_in);
    let mut ticks = 0u64;
    while !state.is_finished() {
        assert!(ticks < expected, "clock ran past its computed length");
        state = tick(state, &exercises).0;
        ticks += 1;
    }
    assert_eq!(ticks, expected);
});
