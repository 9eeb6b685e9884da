#![no_main]

use libfuzzer_sys::fuzz_target;
use markup::{Event, serialize, tokenize};

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let events = tokenize(input);
    let mut depth = 0usize;
    for event in &events {
        match event {
            Event::Start(_) => depth += 1,
            Event::End(_) => {
                depth = depth.checked_sub(1).expect("end without start");
            }
            _ => {}
        }
    }
    assert_eq!(depth, 0, "unbalanced stream for {input:?}");
    let _ = serialize(&events);
});
