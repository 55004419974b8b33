//! Bitcoin script opcodes and opcode classification rules
//!
//! Opcodes are plain bytes. Every value 0x00-0xff is a legal token on the
//! wire; the helpers here classify a byte (push-size prefixed, numeric push,
//! payload-carrying) and map between push data and the opcode that encodes it.
//!
//! Reference: Bitcoin Core `script/script.h`

use crate::script_num;

// ============================================================================
// PUSH DATA (0x00 - 0x4e)
// ============================================================================

/// Push empty array
pub const OP_0: u8 = 0x00;
pub const OP_FALSE: u8 = OP_0;

/// Smallest fixed-size push (1 byte)
pub const OP_PUSHBYTES_1: u8 = 0x01;

/// Largest fixed-size push (75 bytes)
pub const OP_PUSHBYTES_75: u8 = 0x4b;

/// Next byte is the push length
pub const OP_PUSHDATA1: u8 = 0x4c;

/// Next 2 bytes (little-endian) are the push length
pub const OP_PUSHDATA2: u8 = 0x4d;

/// Next 4 bytes (little-endian) are the push length
pub const OP_PUSHDATA4: u8 = 0x4e;

// ============================================================================
// PUSH VALUE (0x4f - 0x60)
// ============================================================================

pub const OP_1NEGATE: u8 = 0x4f;
pub const OP_RESERVED: u8 = 0x50;
pub const OP_1: u8 = 0x51;
pub const OP_TRUE: u8 = OP_1;
pub const OP_2: u8 = 0x52;
pub const OP_3: u8 = 0x53;
pub const OP_4: u8 = 0x54;
pub const OP_5: u8 = 0x55;
pub const OP_6: u8 = 0x56;
pub const OP_7: u8 = 0x57;
pub const OP_8: u8 = 0x58;
pub const OP_9: u8 = 0x59;
pub const OP_10: u8 = 0x5a;
pub const OP_11: u8 = 0x5b;
pub const OP_12: u8 = 0x5c;
pub const OP_13: u8 = 0x5d;
pub const OP_14: u8 = 0x5e;
pub const OP_15: u8 = 0x5f;
pub const OP_16: u8 = 0x60;

/// OP_1 is OP_N_BASE + 1
pub const OP_N_BASE: u8 = 0x50;

// ============================================================================
// CONTROL FLOW (0x61 - 0x6a)
// ============================================================================

pub const OP_NOP: u8 = 0x61;
pub const OP_VER: u8 = 0x62;
pub const OP_IF: u8 = 0x63;
pub const OP_NOTIF: u8 = 0x64;
/// Fails even in an unexecuted branch
pub const OP_VERIF: u8 = 0x65;
pub const OP_VERNOTIF: u8 = 0x66;
pub const OP_ELSE: u8 = 0x67;
pub const OP_ENDIF: u8 = 0x68;
pub const OP_VERIFY: u8 = 0x69;
pub const OP_RETURN: u8 = 0x6a;

// ============================================================================
// STACK (0x6b - 0x7d)
// ============================================================================

pub const OP_TOALTSTACK: u8 = 0x6b;
pub const OP_FROMALTSTACK: u8 = 0x6c;
pub const OP_2DROP: u8 = 0x6d;
pub const OP_2DUP: u8 = 0x6e;
pub const OP_3DUP: u8 = 0x6f;
pub const OP_2OVER: u8 = 0x70;
pub const OP_2ROT: u8 = 0x71;
pub const OP_2SWAP: u8 = 0x72;
pub const OP_IFDUP: u8 = 0x73;
pub const OP_DEPTH: u8 = 0x74;
pub const OP_DROP: u8 = 0x75;
pub const OP_DUP: u8 = 0x76;
pub const OP_NIP: u8 = 0x77;
pub const OP_OVER: u8 = 0x78;
pub const OP_PICK: u8 = 0x79;
pub const OP_ROLL: u8 = 0x7a;
pub const OP_ROT: u8 = 0x7b;
pub const OP_SWAP: u8 = 0x7c;
pub const OP_TUCK: u8 = 0x7d;

// ============================================================================
// SPLICE AND BITWISE (0x7e - 0x8a)
// ============================================================================

pub const OP_CAT: u8 = 0x7e;
pub const OP_SUBSTR: u8 = 0x7f;
pub const OP_LEFT: u8 = 0x80;
pub const OP_RIGHT: u8 = 0x81;
pub const OP_SIZE: u8 = 0x82;
pub const OP_INVERT: u8 = 0x83;
pub const OP_AND: u8 = 0x84;
pub const OP_OR: u8 = 0x85;
pub const OP_XOR: u8 = 0x86;
pub const OP_EQUAL: u8 = 0x87;
pub const OP_EQUALVERIFY: u8 = 0x88;
pub const OP_RESERVED1: u8 = 0x89;
pub const OP_RESERVED2: u8 = 0x8a;

// ============================================================================
// NUMERIC (0x8b - 0xa5)
// ============================================================================

pub const OP_1ADD: u8 = 0x8b;
pub const OP_1SUB: u8 = 0x8c;
pub const OP_2MUL: u8 = 0x8d;
pub const OP_2DIV: u8 = 0x8e;
pub const OP_NEGATE: u8 = 0x8f;
pub const OP_ABS: u8 = 0x90;
pub const OP_NOT: u8 = 0x91;
pub const OP_0NOTEQUAL: u8 = 0x92;
pub const OP_ADD: u8 = 0x93;
pub const OP_SUB: u8 = 0x94;
pub const OP_MUL: u8 = 0x95;
pub const OP_DIV: u8 = 0x96;
pub const OP_MOD: u8 = 0x97;
pub const OP_LSHIFT: u8 = 0x98;
pub const OP_RSHIFT: u8 = 0x99;
pub const OP_BOOLAND: u8 = 0x9a;
pub const OP_BOOLOR: u8 = 0x9b;
pub const OP_NUMEQUAL: u8 = 0x9c;
pub const OP_NUMEQUALVERIFY: u8 = 0x9d;
pub const OP_NUMNOTEQUAL: u8 = 0x9e;
pub const OP_LESSTHAN: u8 = 0x9f;
pub const OP_GREATERTHAN: u8 = 0xa0;
pub const OP_LESSTHANOREQUAL: u8 = 0xa1;
pub const OP_GREATERTHANOREQUAL: u8 = 0xa2;
pub const OP_MIN: u8 = 0xa3;
pub const OP_MAX: u8 = 0xa4;
pub const OP_WITHIN: u8 = 0xa5;

// ============================================================================
// CRYPTO (0xa6 - 0xaf)
// ============================================================================

pub const OP_RIPEMD160: u8 = 0xa6;
pub const OP_SHA1: u8 = 0xa7;
pub const OP_SHA256: u8 = 0xa8;
pub const OP_HASH160: u8 = 0xa9;
pub const OP_HASH256: u8 = 0xaa;

/// Signature checks commit to the position of the last executed separator
/// (BIP342) or to the script after it (legacy)
pub const OP_CODESEPARATOR: u8 = 0xab;

pub const OP_CHECKSIG: u8 = 0xac;
pub const OP_CHECKSIGVERIFY: u8 = 0xad;
pub const OP_CHECKMULTISIG: u8 = 0xae;
pub const OP_CHECKMULTISIGVERIFY: u8 = 0xaf;

// ============================================================================
// EXPANSION (0xb0 - 0xba)
// ============================================================================

pub const OP_NOP1: u8 = 0xb0;
/// BIP65
pub const OP_CHECKLOCKTIMEVERIFY: u8 = 0xb1;
pub const OP_NOP2: u8 = OP_CHECKLOCKTIMEVERIFY;
/// BIP112
pub const OP_CHECKSEQUENCEVERIFY: u8 = 0xb2;
pub const OP_NOP3: u8 = OP_CHECKSEQUENCEVERIFY;
pub const OP_NOP4: u8 = 0xb3;
pub const OP_NOP5: u8 = 0xb4;
pub const OP_NOP6: u8 = 0xb5;
pub const OP_NOP7: u8 = 0xb6;
pub const OP_NOP8: u8 = 0xb7;
pub const OP_NOP9: u8 = 0xb8;
pub const OP_NOP10: u8 = 0xb9;

/// BIP342 (tapscript only)
pub const OP_CHECKSIGADD: u8 = 0xba;

// ============================================================================
// CLASSIFICATION
// ============================================================================

/// Script-number encoding of -1 as a single byte
const NEGATIVE_1_BYTE: u8 = 0x81;

/// True for OP_PUSHDATA1, OP_PUSHDATA2 and OP_PUSHDATA4.
#[inline]
pub fn is_push_size_prefixed(code: u8) -> bool {
    matches!(code, OP_PUSHDATA1 | OP_PUSHDATA2 | OP_PUSHDATA4)
}

/// Width in bytes of the little-endian length prefix following `code`.
#[inline]
pub fn push_prefix_width(code: u8) -> usize {
    match code {
        OP_PUSHDATA1 => 1,
        OP_PUSHDATA2 => 2,
        OP_PUSHDATA4 => 4,
        _ => 0,
    }
}

/// Push-data length implied by the opcode byte alone, `None` for the
/// size-prefixed forms whose length follows on the wire.
#[inline]
pub fn implied_push_size(code: u8) -> Option<usize> {
    match code {
        0..=OP_PUSHBYTES_75 => Some(code as usize),
        OP_PUSHDATA1 | OP_PUSHDATA2 | OP_PUSHDATA4 => None,
        _ => Some(0),
    }
}

/// True for opcodes that carry push data (OP_PUSHBYTES_1 through OP_PUSHDATA4).
#[inline]
pub fn is_payload(code: u8) -> bool {
    (OP_PUSHBYTES_1..=OP_PUSHDATA4).contains(&code)
}

/// True for any push opcode, including OP_0 and the numeric pushes.
#[inline]
pub fn is_push(code: u8) -> bool {
    code <= OP_16 && code != OP_RESERVED
}

/// OP_1 through OP_16
#[inline]
pub fn is_positive(code: u8) -> bool {
    (OP_1..=OP_16).contains(&code)
}

/// OP_1NEGATE, OP_0 and OP_1 through OP_16
#[inline]
pub fn is_numeric(code: u8) -> bool {
    code == OP_0 || code == OP_1NEGATE || is_positive(code)
}

/// Opcode pushing the small integer `value` (1..=16).
#[inline]
pub fn opcode_from_positive(value: u8) -> Option<u8> {
    (1..=16).contains(&value).then(|| OP_N_BASE + value)
}

/// Smallest size-class opcode able to push `size` bytes.
pub fn opcode_from_size(size: usize) -> u8 {
    if size <= OP_PUSHBYTES_75 as usize {
        size as u8
    } else if size <= u8::MAX as usize {
        OP_PUSHDATA1
    } else if size <= u16::MAX as usize {
        OP_PUSHDATA2
    } else {
        OP_PUSHDATA4
    }
}

/// Size-class opcode for `data`, never a numeric opcode.
#[inline]
pub fn nominal_opcode_from_data(data: &[u8]) -> u8 {
    opcode_from_size(data.len())
}

/// Opcode required by the minimal push rule (BIP62): single-byte values
/// 1..=16 and -1 use the numeric opcodes, everything else its size class.
pub fn minimal_opcode_from_data(data: &[u8]) -> u8 {
    if let [value] = data {
        if *value == NEGATIVE_1_BYTE {
            return OP_1NEGATE;
        }
        if let Some(code) = opcode_from_positive(*value) {
            return code;
        }
    }
    nominal_opcode_from_data(data)
}

#[inline]
pub fn opcode_from_data(data: &[u8], minimal: bool) -> u8 {
    if minimal {
        minimal_opcode_from_data(data)
    } else {
        nominal_opcode_from_data(data)
    }
}

// ============================================================================
// MNEMONICS
// ============================================================================

/// Canonical mnemonic for `code`. Unassigned codes render as `0xNN`.
pub fn opcode_to_mnemonic(code: u8) -> String {
    let name = match code {
        OP_0 => "zero",
        OP_PUSHBYTES_1..=OP_PUSHBYTES_75 => return format!("push_{code}"),
        OP_PUSHDATA1 => "pushdata1",
        OP_PUSHDATA2 => "pushdata2",
        OP_PUSHDATA4 => "pushdata4",
        OP_1NEGATE => "-1",
        OP_RESERVED => "reserved",
        OP_1..=OP_16 => return (code - OP_N_BASE).to_string(),
        OP_NOP => "nop",
        OP_VER => "ver",
        OP_IF => "if",
        OP_NOTIF => "notif",
        OP_VERIF => "verif",
        OP_VERNOTIF => "vernotif",
        OP_ELSE => "else",
        OP_ENDIF => "endif",
        OP_VERIFY => "verify",
        OP_RETURN => "return",
        OP_TOALTSTACK => "toaltstack",
        OP_FROMALTSTACK => "fromaltstack",
        OP_2DROP => "2drop",
        OP_2DUP => "2dup",
        OP_3DUP => "3dup",
        OP_2OVER => "2over",
        OP_2ROT => "2rot",
        OP_2SWAP => "2swap",
        OP_IFDUP => "ifdup",
        OP_DEPTH => "depth",
        OP_DROP => "drop",
        OP_DUP => "dup",
        OP_NIP => "nip",
        OP_OVER => "over",
        OP_PICK => "pick",
        OP_ROLL => "roll",
        OP_ROT => "rot",
        OP_SWAP => "swap",
        OP_TUCK => "tuck",
        OP_CAT => "cat",
        OP_SUBSTR => "substr",
        OP_LEFT => "left",
        OP_RIGHT => "right",
        OP_SIZE => "size",
        OP_INVERT => "invert",
        OP_AND => "and",
        OP_OR => "or",
        OP_XOR => "xor",
        OP_EQUAL => "equal",
        OP_EQUALVERIFY => "equalverify",
        OP_RESERVED1 => "reserved1",
        OP_RESERVED2 => "reserved2",
        OP_1ADD => "1add",
        OP_1SUB => "1sub",
        OP_2MUL => "2mul",
        OP_2DIV => "2div",
        OP_NEGATE => "negate",
        OP_ABS => "abs",
        OP_NOT => "not",
        OP_0NOTEQUAL => "0notequal",
        OP_ADD => "add",
        OP_SUB => "sub",
        OP_MUL => "mul",
        OP_DIV => "div",
        OP_MOD => "mod",
        OP_LSHIFT => "lshift",
        OP_RSHIFT => "rshift",
        OP_BOOLAND => "booland",
        OP_BOOLOR => "boolor",
        OP_NUMEQUAL => "numequal",
        OP_NUMEQUALVERIFY => "numequalverify",
        OP_NUMNOTEQUAL => "numnotequal",
        OP_LESSTHAN => "lessthan",
        OP_GREATERTHAN => "greaterthan",
        OP_LESSTHANOREQUAL => "lessthanorequal",
        OP_GREATERTHANOREQUAL => "greaterthanorequal",
        OP_MIN => "min",
        OP_MAX => "max",
        OP_WITHIN => "within",
        OP_RIPEMD160 => "ripemd160",
        OP_SHA1 => "sha1",
        OP_SHA256 => "sha256",
        OP_HASH160 => "hash160",
        OP_HASH256 => "hash256",
        OP_CODESEPARATOR => "codeseparator",
        OP_CHECKSIG => "checksig",
        OP_CHECKSIGVERIFY => "checksigverify",
        OP_CHECKMULTISIG => "checkmultisig",
        OP_CHECKMULTISIGVERIFY => "checkmultisigverify",
        OP_NOP1 => "nop1",
        OP_CHECKLOCKTIMEVERIFY => "checklocktimeverify",
        OP_CHECKSEQUENCEVERIFY => "checksequenceverify",
        OP_NOP4..=OP_NOP10 => return format!("nop{}", code - OP_NOP1 + 1),
        OP_CHECKSIGADD => "checksigadd",
        _ => return format!("0x{code:02x}"),
    };
    name.to_string()
}

/// Parse an opcode mnemonic. Accepts the canonical names produced by
/// [`opcode_to_mnemonic`], legacy aliases (`drop2`, `push_one`, `nop2`, ...),
/// an optional `op_` prefix and the `0xNN` hex form.
pub fn opcode_from_mnemonic(mnemonic: &str) -> Option<u8> {
    let lower = mnemonic.to_ascii_lowercase();
    let name = lower.strip_prefix("op_").unwrap_or(&lower);

    if let Some(hex) = name.strip_prefix("0x") {
        return match hex.len() {
            1 | 2 => u8::from_str_radix(hex, 16).ok(),
            _ => None,
        };
    }

    if let Some(size) = name.strip_prefix("push_") {
        match size {
            "one" => return Some(OP_PUSHDATA1),
            "two" => return Some(OP_PUSHDATA2),
            "four" => return Some(OP_PUSHDATA4),
            _ => {}
        }
        if is_decimal(size) {
            return size
                .parse::<u8>()
                .ok()
                .filter(|size| *size <= OP_PUSHBYTES_75);
        }
        return None;
    }

    if is_decimal(name) {
        return match name.parse::<u8>().ok()? {
            0 => Some(OP_0),
            value => opcode_from_positive(value),
        };
    }

    let code = match name {
        "zero" | "false" => OP_0,
        "pushdata1" => OP_PUSHDATA1,
        "pushdata2" => OP_PUSHDATA2,
        "pushdata4" => OP_PUSHDATA4,
        "-1" | "1negate" => OP_1NEGATE,
        "reserved" | "reserved_80" => OP_RESERVED,
        "true" => OP_1,
        "nop" => OP_NOP,
        "ver" => OP_VER,
        "if" => OP_IF,
        "notif" => OP_NOTIF,
        "verif" => OP_VERIF,
        "vernotif" => OP_VERNOTIF,
        "else" => OP_ELSE,
        "endif" => OP_ENDIF,
        "verify" => OP_VERIFY,
        "return" => OP_RETURN,
        "toaltstack" => OP_TOALTSTACK,
        "fromaltstack" => OP_FROMALTSTACK,
        "2drop" | "drop2" => OP_2DROP,
        "2dup" | "dup2" => OP_2DUP,
        "3dup" | "dup3" => OP_3DUP,
        "2over" | "over2" => OP_2OVER,
        "2rot" | "rot2" => OP_2ROT,
        "2swap" | "swap2" => OP_2SWAP,
        "ifdup" => OP_IFDUP,
        "depth" => OP_DEPTH,
        "drop" => OP_DROP,
        "dup" => OP_DUP,
        "nip" => OP_NIP,
        "over" => OP_OVER,
        "pick" => OP_PICK,
        "roll" => OP_ROLL,
        "rot" => OP_ROT,
        "swap" => OP_SWAP,
        "tuck" => OP_TUCK,
        "cat" => OP_CAT,
        "substr" => OP_SUBSTR,
        "left" => OP_LEFT,
        "right" => OP_RIGHT,
        "size" => OP_SIZE,
        "invert" => OP_INVERT,
        "and" => OP_AND,
        "or" => OP_OR,
        "xor" => OP_XOR,
        "equal" => OP_EQUAL,
        "equalverify" => OP_EQUALVERIFY,
        "reserved1" | "reserved_137" => OP_RESERVED1,
        "reserved2" | "reserved_138" => OP_RESERVED2,
        "1add" | "add1" => OP_1ADD,
        "1sub" | "sub1" => OP_1SUB,
        "2mul" | "mul2" => OP_2MUL,
        "2div" | "div2" => OP_2DIV,
        "negate" => OP_NEGATE,
        "abs" => OP_ABS,
        "not" => OP_NOT,
        "0notequal" | "nonzero" => OP_0NOTEQUAL,
        "add" => OP_ADD,
        "sub" => OP_SUB,
        "mul" => OP_MUL,
        "div" => OP_DIV,
        "mod" => OP_MOD,
        "lshift" => OP_LSHIFT,
        "rshift" => OP_RSHIFT,
        "booland" => OP_BOOLAND,
        "boolor" => OP_BOOLOR,
        "numequal" => OP_NUMEQUAL,
        "numequalverify" => OP_NUMEQUALVERIFY,
        "numnotequal" => OP_NUMNOTEQUAL,
        "lessthan" => OP_LESSTHAN,
        "greaterthan" => OP_GREATERTHAN,
        "lessthanorequal" => OP_LESSTHANOREQUAL,
        "greaterthanorequal" => OP_GREATERTHANOREQUAL,
        "min" => OP_MIN,
        "max" => OP_MAX,
        "within" => OP_WITHIN,
        "ripemd160" => OP_RIPEMD160,
        "sha1" => OP_SHA1,
        "sha256" => OP_SHA256,
        "hash160" => OP_HASH160,
        "hash256" => OP_HASH256,
        "codeseparator" => OP_CODESEPARATOR,
        "checksig" => OP_CHECKSIG,
        "checksigverify" => OP_CHECKSIGVERIFY,
        "checkmultisig" => OP_CHECKMULTISIG,
        "checkmultisigverify" => OP_CHECKMULTISIGVERIFY,
        "nop1" => OP_NOP1,
        "nop2" | "checklocktimeverify" | "cltv" => OP_CHECKLOCKTIMEVERIFY,
        "nop3" | "checksequenceverify" | "csv" => OP_CHECKSEQUENCEVERIFY,
        "nop4" => OP_NOP4,
        "nop5" => OP_NOP5,
        "nop6" => OP_NOP6,
        "nop7" => OP_NOP7,
        "nop8" => OP_NOP8,
        "nop9" => OP_NOP9,
        "nop10" => OP_NOP10,
        "checksigadd" => OP_CHECKSIGADD,
        _ => return None,
    };
    Some(code)
}

fn is_decimal(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}

/// Minimal script-number push data for `value`, as used by decimal
/// mnemonic tokens.
pub fn push_data_from_integer(value: i64) -> Vec<u8> {
    script_num::encode(value)
}
