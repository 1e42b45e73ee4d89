//local shortcuts

//third-party shortcuts
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, Bytes};

//standard shortcuts
use std::collections::BTreeMap;
use std::fmt::{Debug, Display};

//-------------------------------------------------------------------------------------------------------------------

/// Identifies a client endpoint.
///
/// Ids are unique among connected clients and may be reused after a disconnect.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum ClientId
{
    Name(String),
    Number(i64),
}

impl ClientId
{
    /// Returns `false` for ids that cannot name a client (empty names).
    pub fn is_well_formed(&self) -> bool
    {
        match self
        {
            ClientId::Name(name) => !name.is_empty(),
            ClientId::Number(_)  => true,
        }
    }
}

impl Display for ClientId
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result
    {
        match self
        {
            ClientId::Name(name)     => f.write_str(name),
            ClientId::Number(number) => write!(f, "{}", number),
        }
    }
}

impl From<&str> for ClientId { fn from(name: &str) -> Self { Self::Name(String::from(name)) } }
impl From<String> for ClientId { fn from(name: String) -> Self { Self::Name(name) } }
impl From<i64> for ClientId { fn from(number: i64) -> Self { Self::Number(number) } }
impl From<i32> for ClientId { fn from(number: i32) -> Self { Self::Number(number as i64) } }
impl From<u32> for ClientId { fn from(number: u32) -> Self { Self::Number(number as i64) } }

//-------------------------------------------------------------------------------------------------------------------

/// One argument of a remote payload.
#[serde_as]
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub enum Value
{
    #[default]
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Bytes(#[serde_as(as = "Bytes")] Vec<u8>),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

impl Value
{
    pub fn is_nil(&self) -> bool
    {
        matches!(self, Value::Nil)
    }

    pub fn as_bool(&self) -> Option<bool>
    {
        match self { Value::Bool(b) => Some(*b), _ => None }
    }

    pub fn as_int(&self) -> Option<i64>
    {
        match self { Value::Int(i) => Some(*i), _ => None }
    }

    pub fn as_float(&self) -> Option<f64>
    {
        match self
        {
            Value::Float(f) => Some(*f),
            Value::Int(i)   => Some(*i as f64),
            _               => None,
        }
    }

    pub fn as_str(&self) -> Option<&str>
    {
        match self { Value::Str(s) => Some(s.as_str()), _ => None }
    }
}

impl From<()> for Value { fn from(_: ()) -> Self { Self::Nil } }
impl From<bool> for Value { fn from(b: bool) -> Self { Self::Bool(b) } }
impl From<i32> for Value { fn from(i: i32) -> Self { Self::Int(i as i64) } }
impl From<i64> for Value { fn from(i: i64) -> Self { Self::Int(i) } }
impl From<u32> for Value { fn from(i: u32) -> Self { Self::Int(i as i64) } }
impl From<f64> for Value { fn from(f: f64) -> Self { Self::Float(f) } }
impl From<&str> for Value { fn from(s: &str) -> Self { Self::Str(String::from(s)) } }
impl From<String> for Value { fn from(s: String) -> Self { Self::Str(s) } }
impl From<Vec<u8>> for Value { fn from(b: Vec<u8>) -> Self { Self::Bytes(b) } }
impl From<Vec<Value>> for Value { fn from(l: Vec<Value>) -> Self { Self::List(l) } }
impl From<BTreeMap<String, Value>> for Value { fn from(m: BTreeMap<String, Value>) -> Self { Self::Map(m) } }

impl<T: Into<Value>> From<Option<T>> for Value
{
    fn from(v: Option<T>) -> Self
    {
        match v { Some(v) => v.into(), None => Self::Nil }
    }
}

/// Ordered argument list carried by events, requests and responses.
///
/// Argument count and order are preserved end to end.
pub type Args = Vec<Value>;

/// Builds an [`Args`] list from anything convertible into [`Value`].
///
/// Example:
/**
let args = args![1, "two", true];
*/
#[macro_export]
macro_rules! args
{
    () => { $crate::Args::new() };
    ($($arg:expr),+ $(,)?) => { vec![$($crate::Value::from($arg)),+] };
}

//-------------------------------------------------------------------------------------------------------------------

/// The two kinds of named remote primitives.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum RemoteKind
{
    Event,
    Function,
}

impl Display for RemoteKind
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result
    {
        match self
        {
            RemoteKind::Event    => f.write_str("RemoteEvent"),
            RemoteKind::Function => f.write_str("RemoteFunction"),
        }
    }
}

//-------------------------------------------------------------------------------------------------------------------
