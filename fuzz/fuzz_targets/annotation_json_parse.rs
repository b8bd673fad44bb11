//! Fuzz target for JSON annotation parsing (COCO, single-image COCO, LabelMe).
//!
//! Exercises variant classification and every variant parser on arbitrary
//! bytes.

#![no_main]

use libfuzzer_sys::fuzz_target;
use labelcensus::parse::json::from_json_slice;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let _ = from_json_slice(data);
});
