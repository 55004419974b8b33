#![no_main]
use blvm_primitives::script::Script;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Any byte string parses and reproduces itself exactly.
    let script = Script::from_data(data);
    assert!(script.is_valid());
    assert_eq!(script.serialized_size(false), data.len());
    let bytes = script.to_data(false).expect("parsed scripts always serialize");
    assert_eq!(bytes, data);

    // At most one underflow token, and only at the end.
    let underflows = script.ops().iter().filter(|op| op.is_underflow()).count();
    assert!(underflows <= 1);
    if underflows == 1 {
        assert!(script.is_underflow());
    }

    // Mnemonic text parses back to the same operations.
    let text = script.to_string();
    let reparsed = Script::from_mnemonic(&text).expect("printed mnemonics always parse");
    assert_eq!(reparsed, script);
});
