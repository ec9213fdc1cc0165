//! Command definitions
//!
//! The tagged form of one transaction command.

use std::fmt;

/// Disk operation kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiskKind {
    Read,
    Write,
    Output,
}

impl DiskKind {
    /// Keywords in classification order
    pub const KEYWORDS: [(&'static str, DiskKind); 3] = [
        ("READ", DiskKind::Read),
        ("WRITE", DiskKind::Write),
        ("OUTPUT", DiskKind::Output),
    ];

    pub fn keyword(&self) -> &'static str {
        match self {
            DiskKind::Read => "READ",
            DiskKind::Write => "WRITE",
            DiskKind::Output => "OUTPUT",
        }
    }
}

/// Arithmetic operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
}

impl Operator {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Operator::Add),
            '-' => Some(Operator::Sub),
            '*' => Some(Operator::Mul),
            '/' => Some(Operator::Div),
            _ => None,
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Sub => '-',
            Operator::Mul => '*',
            Operator::Div => '/',
        }
    }

    /// Apply with overflow checking.
    ///
    /// Returns `None` on overflow or division by zero; callers tell the two
    /// apart by the literal.
    pub fn apply(&self, lhs: i64, rhs: i64) -> Option<i64> {
        match self {
            Operator::Add => lhs.checked_add(rhs),
            Operator::Sub => lhs.checked_sub(rhs),
            Operator::Mul => lhs.checked_mul(rhs),
            Operator::Div => lhs.checked_div(rhs),
        }
    }
}

/// `dest := src <op> literal`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArithOp {
    pub dest: String,
    pub src: String,
    pub operator: Operator,
    pub literal: i64,
}

/// A disk operation; only `OUTPUT` has no register operand
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiskOp {
    /// `READ(addr,reg)`
    Read { address: String, register: String },

    /// `WRITE(addr,reg)`
    Write { address: String, register: String },

    /// `OUTPUT(addr)`
    Output { address: String },
}

impl DiskOp {
    pub fn kind(&self) -> DiskKind {
        match self {
            DiskOp::Read { .. } => DiskKind::Read,
            DiskOp::Write { .. } => DiskKind::Write,
            DiskOp::Output { .. } => DiskKind::Output,
        }
    }
}

/// A classified command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `READ`, `WRITE` or `OUTPUT`
    Disk(DiskOp),

    /// Register arithmetic against an integer literal
    Arith(ArithOp),
}

impl Command {
    /// Classify and parse one command line.
    ///
    /// Disk keywords are checked before arithmetic operators. Returns a
    /// human-readable reason on failure; the caller attaches the line number.
    pub fn parse(text: &str) -> std::result::Result<Self, String> {
        let text = text.trim();

        for (keyword, kind) in DiskKind::KEYWORDS {
            if text.contains(keyword) {
                return parse_disk(text, kind);
            }
        }

        if text.contains(|c| Operator::from_char(c).is_some()) {
            return parse_arith(text);
        }

        Err(format!("unrecognized command: {}", text))
    }
}

fn parse_disk(text: &str, kind: DiskKind) -> std::result::Result<Command, String> {
    let open = text
        .find('(')
        .ok_or_else(|| format!("{}: missing '('", kind.keyword()))?;
    let close = text
        .rfind(')')
        .filter(|&close| close > open)
        .ok_or_else(|| format!("{}: missing ')'", kind.keyword()))?;

    if text[..open].trim() != kind.keyword() {
        return Err(format!("unrecognized disk operation: {}", text));
    }

    let operands: Vec<&str> = text[open + 1..close].split(',').map(str::trim).collect();
    let expected = match kind {
        DiskKind::Output => 1,
        DiskKind::Read | DiskKind::Write => 2,
    };

    if operands.len() != expected || operands.iter().any(|op| op.is_empty()) {
        return Err(format!(
            "{} expects {} operand(s), got: {}",
            kind.keyword(),
            expected,
            text
        ));
    }

    let address = operands[0].to_string();
    let op = match kind {
        DiskKind::Read => DiskOp::Read {
            address,
            register: operands[1].to_string(),
        },
        DiskKind::Write => DiskOp::Write {
            address,
            register: operands[1].to_string(),
        },
        DiskKind::Output => DiskOp::Output { address },
    };

    Ok(Command::Disk(op))
}

fn parse_arith(text: &str) -> std::result::Result<Command, String> {
    let (lhs, rhs) = text
        .split_once(":=")
        .ok_or_else(|| format!("arithmetic command missing ':=': {}", text))?;

    let dest = lhs.trim();
    let rhs = rhs.trim();
    if dest.is_empty() {
        return Err(format!("arithmetic command missing destination: {}", text));
    }

    // First operator after the source register; a sign on the literal stays
    // with the literal.
    let (index, operator) = rhs
        .char_indices()
        .skip(1)
        .find_map(|(i, c)| Operator::from_char(c).map(|op| (i, op)))
        .ok_or_else(|| format!("arithmetic command missing operator: {}", text))?;

    let src = rhs[..index].trim();
    let literal = rhs[index + 1..].trim();
    if src.is_empty() {
        return Err(format!("arithmetic command missing source register: {}", text));
    }

    let literal: i64 = literal
        .parse()
        .map_err(|_| format!("arithmetic literal is not an integer: {}", literal))?;

    Ok(Command::Arith(ArithOp {
        dest: dest.to_string(),
        src: src.to_string(),
        operator,
        literal,
    }))
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Disk(op) => write!(f, "{}", op),
            Command::Arith(op) => write!(f, "{}", op),
        }
    }
}

impl fmt::Display for DiskOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiskOp::Read { address, register } | DiskOp::Write { address, register } => {
                write!(f, "{}({},{})", self.kind().keyword(), address, register)
            }
            DiskOp::Output { address } => write!(f, "{}({})", self.kind().keyword(), address),
        }
    }
}

impl fmt::Display for ArithOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} := {} {} {}",
            self.dest,
            self.src,
            self.operator.symbol(),
            self.literal
        )
    }
}
