use chrono::{Local, NaiveDate};
use quick_xml::{
    events::{BytesStart, Event},
    Reader,
};

use super::{error::ServiceError, transport::SoapReply};
use crate::account::{Account, AccountType};

/// Child names that make an element look like an account
const ACCOUNT_FIELDS: [&str; 4] = ["id", "solde", "dateCreation", "type"];

/// A parsed XML element. Names are local names, namespace prefixes are dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SoapNode {
    pub name: String,
    /// Attributes keyed by their qualified name, namespace declarations excluded
    pub attributes: Vec<(String, String)>,
    pub text: Option<String>,
    pub children: Vec<SoapNode>,
}

impl SoapNode {
    pub fn parse(xml: &str) -> Result<SoapNode, ServiceError> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<SoapNode> = Vec::new();
        let mut root: Option<SoapNode> = None;

        loop {
            match reader.read_event()? {
                Event::Start(start) => stack.push(SoapNode::from_start(&start)?),
                Event::Empty(start) => {
                    let node = SoapNode::from_start(&start)?;
                    attach(&mut stack, &mut root, node);
                }
                Event::End(_) => {
                    let node = stack.pop().ok_or_else(|| {
                        ServiceError::MalformedResponse("unbalanced closing tag".to_string())
                    })?;
                    attach(&mut stack, &mut root, node);
                }
                Event::Text(text) => {
                    if let Some(node) = stack.last_mut() {
                        node.push_text(&text.unescape().map_err(malformed)?);
                    }
                }
                Event::CData(data) => {
                    if let Some(node) = stack.last_mut() {
                        node.push_text(&String::from_utf8_lossy(&data.into_inner()));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !stack.is_empty() {
            return Err(ServiceError::MalformedResponse(
                "unexpected end of document".to_string(),
            ));
        }
        root.ok_or_else(|| ServiceError::MalformedResponse("empty document".to_string()))
    }

    fn from_start(start: &BytesStart) -> Result<SoapNode, ServiceError> {
        let name = utf8(start.local_name().as_ref())?;
        let mut attributes = Vec::new();
        for attribute in start.attributes() {
            let attribute = attribute.map_err(malformed)?;
            let key = attribute.key.as_ref();
            if key == b"xmlns" || key.starts_with(b"xmlns:") {
                continue;
            }
            attributes.push((
                utf8(key)?,
                attribute.unescape_value().map_err(malformed)?.into_owned(),
            ));
        }

        Ok(SoapNode {
            name,
            attributes,
            text: None,
            children: Vec::new(),
        })
    }

    fn push_text(&mut self, text: &str) {
        match self.text.as_mut() {
            Some(existing) => existing.push_str(text),
            None => self.text = Some(text.to_string()),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn child(&self, name: &str) -> Option<&SoapNode> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).and_then(|c| c.text.as_deref())
    }

    /// Attribute lookup by local name, whatever prefix the document bound it to.
    pub fn attribute(&self, local_name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key.rsplit(':').next() == Some(local_name))
            .map(|(_, value)| value.as_str())
    }
}

fn attach(stack: &mut [SoapNode], root: &mut Option<SoapNode>, node: SoapNode) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => {
            if root.is_none() {
                *root = Some(node);
            }
        }
    }
}

fn utf8(bytes: &[u8]) -> Result<String, ServiceError> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(malformed)
}

fn malformed(err: impl std::fmt::Display) -> ServiceError {
    ServiceError::MalformedResponse(err.to_string())
}

/// Extract the operation response element from a SOAP envelope.
///
/// # Returns
///
/// The first element of the body, `None` when the body is empty, or a
/// `ServiceError::Fault` when the server answered with a SOAP fault.
pub fn decode_envelope(xml: &str) -> Result<Option<SoapNode>, ServiceError> {
    let envelope = SoapNode::parse(xml)?;
    if envelope.name != "Envelope" {
        return Err(ServiceError::MalformedResponse(format!(
            "expected a SOAP envelope, found <{}>",
            envelope.name
        )));
    }

    let body = envelope
        .children
        .into_iter()
        .find(|c| c.name == "Body")
        .ok_or_else(|| ServiceError::MalformedResponse("missing SOAP body".to_string()))?;

    match body.children.into_iter().next() {
        Some(fault) if fault.name == "Fault" => Err(ServiceError::Fault {
            code: fault.child_text("faultcode").unwrap_or_default().to_string(),
            message: fault.child_text("faultstring").unwrap_or_default().to_string(),
        }),
        response => Ok(response),
    }
}

/// Decode an HTTP reply. Faults win over the status code since SOAP 1.1
/// servers report them with a 500.
pub fn decode_reply(reply: &SoapReply) -> Result<Option<SoapNode>, ServiceError> {
    let decoded = decode_envelope(&reply.body);
    if (200..300).contains(&reply.status) || matches!(decoded, Err(ServiceError::Fault { .. })) {
        decoded
    } else {
        Err(ServiceError::Status {
            status: reply.status,
            body: reply.body.clone(),
        })
    }
}

/// The three shapes a list response comes in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResponseShape<'a> {
    /// A single child holding the account collection
    Wrapper(&'a SoapNode),
    /// Account elements directly under the response element
    Collection(&'a [SoapNode]),
    /// The response element is itself an account
    Single(&'a SoapNode),
}

impl<'a> ResponseShape<'a> {
    pub fn inspect(response: &'a SoapNode) -> ResponseShape<'a> {
        if is_account_shaped(response) {
            return ResponseShape::Single(response);
        }
        match response.children.as_slice() {
            [only] if !only.is_leaf() && !is_account_shaped(only) => ResponseShape::Wrapper(only),
            children => ResponseShape::Collection(children),
        }
    }

    /// Account elements in document order. Items that don't look like accounts are skipped.
    pub fn flatten(&self) -> Vec<&'a SoapNode> {
        match *self {
            ResponseShape::Single(node) => vec![node],
            ResponseShape::Collection(items) => {
                items.iter().filter(|n| is_account_shaped(n)).collect()
            }
            ResponseShape::Wrapper(inner) => inner
                .children
                .iter()
                .filter(|n| is_account_shaped(n))
                .collect(),
        }
    }
}

pub fn is_account_shaped(node: &SoapNode) -> bool {
    node.children
        .iter()
        .any(|c| c.is_leaf() && ACCOUNT_FIELDS.contains(&c.name.as_str()))
}

/// Build an account out of an account-shaped element. Every field falls back
/// to a default instead of failing.
pub fn decode_account(node: &SoapNode) -> Account {
    Account::new(
        node.child_text("id").and_then(|id| id.parse::<i64>().ok()),
        node.child_text("solde")
            .and_then(|balance| balance.parse::<f64>().ok())
            .unwrap_or(0.0),
        parse_date(node.child_text("dateCreation")),
        AccountType::from_wire(node.child_text("type")),
    )
}

pub fn decode_accounts(response: &SoapNode) -> Vec<Account> {
    ResponseShape::inspect(response)
        .flatten()
        .into_iter()
        .map(decode_account)
        .collect()
}

/// Parse the date part of a timestamp such as `2024-01-15T10:00:00+01:00`.
///
/// Anything after the `yyyy-MM-dd` prefix is ignored. Blank or unparseable
/// input yields today's date.
pub fn parse_date(raw: Option<&str>) -> NaiveDate {
    let today = || Local::now().date_naive();
    let Some(raw) = raw.filter(|r| !r.trim().is_empty()) else {
        return today();
    };
    let date_part = raw.split_once('T').map_or(raw, |(date, _)| date);

    NaiveDate::parse_and_remainder(date_part, "%Y-%m-%d")
        .map(|(date, _)| date)
        .unwrap_or_else(|_| today())
}

/// A single value returned by an operation, as typed by the server.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SoapValue<'a> {
    Boolean(bool),
    Text(&'a str),
    Primitive(&'a str),
    Object(&'a SoapNode),
}

impl<'a> SoapValue<'a> {
    /// The first value under the response element, if any. A response
    /// element carrying only text is its own value; a nil leaf is no value.
    pub fn of(response: &'a SoapNode) -> Option<SoapValue<'a>> {
        let Some(node) = response.children.first() else {
            return response
                .text
                .as_deref()
                .filter(|text| !text.is_empty())
                .map(SoapValue::Primitive);
        };
        if !node.is_leaf() {
            return Some(SoapValue::Object(node));
        }
        if node.attribute("nil") == Some("true") {
            return None;
        }

        let text = node.text.as_deref().unwrap_or_default();
        let xsd_type = node
            .attribute("type")
            .map(|t| t.rsplit(':').next().unwrap_or(t));

        Some(match xsd_type {
            Some("boolean") => match text {
                "true" | "1" => SoapValue::Boolean(true),
                "false" | "0" => SoapValue::Boolean(false),
                _ => SoapValue::Primitive(text),
            },
            Some("string") => SoapValue::Text(text),
            _ => SoapValue::Primitive(text),
        })
    }

    pub fn as_bool(&self) -> bool {
        match self {
            SoapValue::Boolean(value) => *value,
            SoapValue::Text(text) | SoapValue::Primitive(text) => text.eq_ignore_ascii_case("true"),
            SoapValue::Object(_) => false,
        }
    }
}
