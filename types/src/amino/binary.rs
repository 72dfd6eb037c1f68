//! Amino binary encoding of the transactions the feeder broadcasts.
//!
//! Covers `auth/StdTx` carrying oracle prevote/vote messages, signed with a
//! secp256k1 key.
//!
//! A field is `uvarint(number << 3 | typ3)` followed by its value. Strings,
//! bytes, structs, and interfaces are length-prefixed (typ3 2); integers are
//! uvarints (typ3 0). Empty strings, empty byte slices, and zero integers are
//! omitted; nested structs are always written. A registered concrete type
//! starts with its 4 prefix bytes: `sha256(name)` with leading zero bytes
//! skipped, then 3 disambiguation bytes skipped, then leading zeros skipped
//! again. `sdk.Dec` and `sdk.Int` travel as their integer string (a `Dec` is
//! scaled by 10^18, with no decimal point). The transaction as a whole is
//! length-prefixed.

use crate::address::{AccAddress, ValAddress};
use crate::bech32::AddressError;
use crate::coin::{Coin, StdFee};
use crate::dec::Dec;
use crate::error::TypesError;
use crate::msg::{MsgPricePrevote, MsgPriceVote, OracleMsg};
use crate::tx::{PubKey, StdSignature, StdTx, PUBKEY_SECP256K1_TYPE};

/// `auth/StdTx`
pub const STD_TX_PREFIX: [u8; 4] = [0xf0, 0x62, 0x5d, 0xee];
/// `oracle/MsgPricePrevote`
pub const MSG_PRICE_PREVOTE_PREFIX: [u8; 4] = [0x9f, 0x09, 0x5e, 0x3c];
/// `oracle/MsgPriceVote`
pub const MSG_PRICE_VOTE_PREFIX: [u8; 4] = [0xa0, 0xc6, 0xef, 0x40];
/// `tendermint/PubKeySecp256k1`
pub const PUBKEY_SECP256K1_PREFIX: [u8; 4] = [0xeb, 0x5a, 0xe9, 0x87];

const TYP3_VARINT: u8 = 0;
const TYP3_BYTE_LENGTH: u8 = 2;

fn malformed(reason: impl Into<String>) -> TypesError {
    TypesError::Amino(reason.into())
}

#[derive(Default)]
struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    fn with_prefix(prefix: [u8; 4]) -> Self {
        Self {
            buf: prefix.to_vec(),
        }
    }

    fn uvarint(&mut self, mut value: u64) {
        while value >= 0x80 {
            self.buf.push((value as u8 & 0x7f) | 0x80);
            value >>= 7;
        }
        self.buf.push(value as u8);
    }

    fn key(&mut self, field: u32, typ3: u8) {
        self.uvarint((u64::from(field) << 3) | u64::from(typ3));
    }

    /// Length-prefixed field, written even when empty (structs, interfaces).
    fn nested(&mut self, field: u32, bytes: &[u8]) {
        self.key(field, TYP3_BYTE_LENGTH);
        self.uvarint(bytes.len() as u64);
        self.buf.extend_from_slice(bytes);
    }

    fn bytes(&mut self, field: u32, bytes: &[u8]) {
        if !bytes.is_empty() {
            self.nested(field, bytes);
        }
    }

    fn string(&mut self, field: u32, value: &str) {
        self.bytes(field, value.as_bytes());
    }

    fn u64(&mut self, field: u32, value: u64) {
        if value != 0 {
            self.key(field, TYP3_VARINT);
            self.uvarint(value);
        }
    }

    fn finish(self) -> Vec<u8> {
        self.buf
    }
}

/// Encode a signed transaction the way the node's tx decoder expects it.
pub fn encode_std_tx(tx: &StdTx) -> Result<Vec<u8>, TypesError> {
    let mut body = Writer::with_prefix(STD_TX_PREFIX);
    for msg in &tx.msgs {
        body.nested(1, &encode_msg(msg)?);
    }
    body.nested(2, &encode_fee(&tx.fee));
    for signature in &tx.signatures {
        body.nested(3, &encode_signature(signature)?);
    }
    body.string(4, &tx.memo);
    let body = body.finish();

    let mut out = Writer::default();
    out.uvarint(body.len() as u64);
    out.buf.extend_from_slice(&body);
    Ok(out.finish())
}

fn address_bytes(
    address: &str,
    bytes: Result<Vec<u8>, AddressError>,
) -> Result<Vec<u8>, TypesError> {
    bytes.map_err(|e| TypesError::InvalidAddress(format!("{address}: {e}")))
}

fn encode_msg(msg: &OracleMsg) -> Result<Vec<u8>, TypesError> {
    let out = match msg {
        OracleMsg::PricePrevote(m) => {
            let mut w = Writer::with_prefix(MSG_PRICE_PREVOTE_PREFIX);
            w.string(1, &m.hash);
            w.string(2, &m.denom);
            w.bytes(3, &address_bytes(m.feeder.as_str(), m.feeder.to_bytes())?);
            w.bytes(4, &address_bytes(m.validator.as_str(), m.validator.to_bytes())?);
            w.finish()
        }
        OracleMsg::PriceVote(m) => {
            let mut w = Writer::with_prefix(MSG_PRICE_VOTE_PREFIX);
            w.string(1, &m.price.raw().to_string());
            w.string(2, &m.salt);
            w.string(3, &m.denom);
            w.bytes(4, &address_bytes(m.feeder.as_str(), m.feeder.to_bytes())?);
            w.bytes(5, &address_bytes(m.validator.as_str(), m.validator.to_bytes())?);
            w.finish()
        }
    };
    Ok(out)
}

fn encode_fee(fee: &StdFee) -> Vec<u8> {
    let mut w = Writer::default();
    for coin in &fee.amount {
        let mut c = Writer::default();
        c.string(1, &coin.denom);
        c.string(2, &coin.amount.to_string());
        w.nested(1, &c.finish());
    }
    w.u64(2, fee.gas);
    w.finish()
}

fn encode_signature(signature: &StdSignature) -> Result<Vec<u8>, TypesError> {
    let mut w = Writer::default();
    w.bytes(1, &encode_pub_key(&signature.pub_key)?);
    w.bytes(2, &signature.signature);
    Ok(w.finish())
}

fn encode_pub_key(key: &PubKey) -> Result<Vec<u8>, TypesError> {
    if key.key_type != PUBKEY_SECP256K1_TYPE {
        return Err(malformed(format!("unregistered public key type {:?}", key.key_type)));
    }
    let mut w = Writer::with_prefix(PUBKEY_SECP256K1_PREFIX);
    w.uvarint(key.value.len() as u64);
    w.buf.extend_from_slice(&key.value);
    Ok(w.finish())
}

enum Value<'a> {
    Varint(u64),
    Bytes(&'a [u8]),
}

impl<'a> Value<'a> {
    fn bytes(self) -> Result<&'a [u8], TypesError> {
        match self {
            Value::Bytes(b) => Ok(b),
            Value::Varint(_) => Err(malformed("expected length-prefixed field")),
        }
    }

    fn string(self) -> Result<String, TypesError> {
        String::from_utf8(self.bytes()?.to_vec()).map_err(|e| malformed(e.to_string()))
    }

    fn varint(self) -> Result<u64, TypesError> {
        match self {
            Value::Varint(v) => Ok(v),
            Value::Bytes(_) => Err(malformed("expected varint field")),
        }
    }
}

struct Reader<'a> {
    buf: &'a [u8],
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }

    fn uvarint(&mut self) -> Result<u64, TypesError> {
        let mut value = 0u64;
        for shift in (0..64).step_by(7) {
            let (&byte, rest) = self
                .buf
                .split_first()
                .ok_or_else(|| malformed("truncated varint"))?;
            self.buf = rest;
            value |= u64::from(byte & 0x7f) << shift;
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        Err(malformed("varint overflows u64"))
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], TypesError> {
        if len > self.buf.len() {
            return Err(malformed("truncated field"));
        }
        let (head, rest) = self.buf.split_at(len);
        self.buf = rest;
        Ok(head)
    }

    fn prefix(&mut self, expected: [u8; 4]) -> Result<(), TypesError> {
        let found = self.take(4)?;
        if found != expected {
            return Err(malformed(format!(
                "expected prefix {}, found {}",
                to_hex(&expected),
                to_hex(found)
            )));
        }
        Ok(())
    }

    fn field(&mut self) -> Result<Option<(u32, Value<'a>)>, TypesError> {
        if self.buf.is_empty() {
            return Ok(None);
        }
        let key = self.uvarint()?;
        let number = u32::try_from(key >> 3).map_err(|_| malformed("field number too large"))?;
        let value = match (key & 0x7) as u8 {
            TYP3_VARINT => Value::Varint(self.uvarint()?),
            TYP3_BYTE_LENGTH => {
                let len = usize::try_from(self.uvarint()?)
                    .map_err(|_| malformed("field length too large"))?;
                Value::Bytes(self.take(len)?)
            }
            other => return Err(malformed(format!("unsupported typ3 {other}"))),
        };
        Ok(Some((number, value)))
    }
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn unexpected(what: &str, field: u32) -> TypesError {
    malformed(format!("unexpected field {field} in {what}"))
}

/// Decode a transaction produced by [`encode_std_tx`]. Addresses are
/// re-encoded under `hrp` (and `{hrp}valoper` for validators).
pub fn decode_std_tx(bytes: &[u8], hrp: &str) -> Result<StdTx, TypesError> {
    let mut outer = Reader::new(bytes);
    let len = usize::try_from(outer.uvarint()?).map_err(|_| malformed("length too large"))?;
    if len != outer.buf.len() {
        return Err(malformed(format!(
            "length prefix {len} does not match {} remaining bytes",
            outer.buf.len()
        )));
    }

    let mut r = Reader::new(outer.buf);
    r.prefix(STD_TX_PREFIX)?;
    let mut tx = StdTx {
        msgs: Vec::new(),
        fee: StdFee {
            amount: Vec::new(),
            gas: 0,
        },
        signatures: Vec::new(),
        memo: String::new(),
    };
    while let Some((field, value)) = r.field()? {
        match field {
            1 => tx.msgs.push(decode_msg(value.bytes()?, hrp)?),
            2 => tx.fee = decode_fee(value.bytes()?)?,
            3 => tx.signatures.push(decode_signature(value.bytes()?)?),
            4 => tx.memo = value.string()?,
            n => return Err(unexpected("StdTx", n)),
        }
    }
    Ok(tx)
}

fn decode_msg(bytes: &[u8], hrp: &str) -> Result<OracleMsg, TypesError> {
    let (prefix, body) = bytes.split_at(bytes.len().min(4));
    let mut r = Reader::new(body);

    if prefix == MSG_PRICE_PREVOTE_PREFIX {
        let mut msg = MsgPricePrevote {
            denom: String::new(),
            feeder: AccAddress::new(""),
            hash: String::new(),
            validator: ValAddress::new(""),
        };
        while let Some((field, value)) = r.field()? {
            match field {
                1 => msg.hash = value.string()?,
                2 => msg.denom = value.string()?,
                3 => msg.feeder = AccAddress::from_bytes(hrp, value.bytes()?),
                4 => msg.validator = ValAddress::from_bytes(hrp, value.bytes()?),
                n => return Err(unexpected("MsgPricePrevote", n)),
            }
        }
        return Ok(OracleMsg::PricePrevote(msg));
    }

    if prefix == MSG_PRICE_VOTE_PREFIX {
        let mut msg = MsgPriceVote {
            denom: String::new(),
            feeder: AccAddress::new(""),
            price: Dec::ZERO,
            salt: String::new(),
            validator: ValAddress::new(""),
        };
        while let Some((field, value)) = r.field()? {
            match field {
                1 => {
                    let raw = value.string()?;
                    let raw: i128 = raw
                        .parse()
                        .map_err(|_| malformed(format!("bad decimal {raw:?}")))?;
                    msg.price = Dec::from_raw(raw);
                }
                2 => msg.salt = value.string()?,
                3 => msg.denom = value.string()?,
                4 => msg.feeder = AccAddress::from_bytes(hrp, value.bytes()?),
                5 => msg.validator = ValAddress::from_bytes(hrp, value.bytes()?),
                n => return Err(unexpected("MsgPriceVote", n)),
            }
        }
        return Ok(OracleMsg::PriceVote(msg));
    }

    Err(malformed(format!("unregistered message prefix {}", to_hex(prefix))))
}

fn decode_fee(bytes: &[u8]) -> Result<StdFee, TypesError> {
    let mut fee = StdFee {
        amount: Vec::new(),
        gas: 0,
    };
    let mut r = Reader::new(bytes);
    while let Some((field, value)) = r.field()? {
        match field {
            1 => fee.amount.push(decode_coin(value.bytes()?)?),
            2 => fee.gas = value.varint()?,
            n => return Err(unexpected("StdFee", n)),
        }
    }
    Ok(fee)
}

fn decode_coin(bytes: &[u8]) -> Result<Coin, TypesError> {
    let mut coin = Coin::new(0, "");
    let mut r = Reader::new(bytes);
    while let Some((field, value)) = r.field()? {
        match field {
            1 => coin.denom = value.string()?,
            2 => {
                let raw = value.string()?;
                coin.amount = raw
                    .parse()
                    .map_err(|_| malformed(format!("bad coin amount {raw:?}")))?;
            }
            n => return Err(unexpected("Coin", n)),
        }
    }
    Ok(coin)
}

fn decode_signature(bytes: &[u8]) -> Result<StdSignature, TypesError> {
    let mut pub_key = None;
    let mut signature = Vec::new();
    let mut r = Reader::new(bytes);
    while let Some((field, value)) = r.field()? {
        match field {
            1 => pub_key = Some(decode_pub_key(value.bytes()?)?),
            2 => signature = value.bytes()?.to_vec(),
            n => return Err(unexpected("StdSignature", n)),
        }
    }
    let pub_key = pub_key.ok_or_else(|| malformed("signature without public key"))?;
    Ok(StdSignature { pub_key, signature })
}

fn decode_pub_key(bytes: &[u8]) -> Result<PubKey, TypesError> {
    let mut r = Reader::new(bytes);
    r.prefix(PUBKEY_SECP256K1_PREFIX)?;
    let len = usize::try_from(r.uvarint()?).map_err(|_| malformed("key length too large"))?;
    let value = r.take(len)?.to_vec();
    if !r.buf.is_empty() {
        return Err(malformed("trailing bytes after public key"));
    }
    Ok(PubKey::secp256k1(&value))
}
