#![no_main]

use codec::{
    parse_message, CodecLimits, NoSession, ParseContext, ParsedMessage, StaticCapabilities,
};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(catalog) = demo_catalog::demo_catalog() else {
        return;
    };
    let capabilities = StaticCapabilities::new().with("EventQueueGet", "https://sim/cap/1");
    let limits = CodecLimits::for_testing();
    let ctx = ParseContext {
        registry: &catalog,
        session: &NoSession,
        capabilities: &capabilities,
        limits: &limits,
    };

    if let Ok(ParsedMessage::Datagram(datagram)) = parse_message(&ctx, text) {
        // Parsed text stays within the wire limit once framed.
        let _ = datagram.to_datagram(&limits);
    }
});
