#![no_main]

use codec::{decode_message, render_message, CodecLimits, Direction, RenderOptions};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(catalog) = demo_catalog::demo_catalog() else {
        return;
    };
    let limits = CodecLimits::for_testing();

    // Framing alone must never read past the buffer.
    let _ = wire::decode_datagram(data, &limits.wire);

    if let Ok(message) = decode_message(&catalog, data, &limits) {
        let _ = render_message(&message, Direction::Incoming, &RenderOptions::default());
        let summary = RenderOptions {
            summary: true,
            ..RenderOptions::default()
        };
        let _ = render_message(&message, Direction::Outgoing, &summary);
    }
});
