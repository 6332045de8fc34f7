pub mod config;
pub mod envelope;
pub mod error;
pub mod response;
pub mod transport;

use tracing::{debug, error, info};

use self::{
    config::ServiceConfig,
    envelope::SoapRequest,
    error::ServiceError,
    response::{decode_accounts, decode_reply, SoapNode, SoapValue},
    transport::{HttpTransport, SoapTransport},
};
use crate::{
    account::{Account, AccountType},
    constants::{CREATE_ACCOUNT_OPERATION, DELETE_ACCOUNT_OPERATION, GET_ACCOUNTS_OPERATION},
};

/// Client of the SOAP account service.
///
/// Every operation comes in two flavours: `try_*` surfaces a `ServiceError`,
/// the plain one logs the error and falls back to an empty list or `false`.
pub struct AccountServiceClient<T = HttpTransport> {
    config: ServiceConfig,
    /// Transport used to reach the service, HTTP unless a test swaps it
    transport: T,
}

impl AccountServiceClient<HttpTransport> {
    pub fn new() -> Self {
        Self::with_config(ServiceConfig::default())
    }

    pub fn with_config(config: ServiceConfig) -> Self {
        let transport = HttpTransport::new(config.timeout);
        AccountServiceClient { config, transport }
    }
}

impl Default for AccountServiceClient<HttpTransport> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: SoapTransport> AccountServiceClient<T> {
    pub fn with_transport(config: ServiceConfig, transport: T) -> Self {
        AccountServiceClient { config, transport }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Send a request and return the operation response element, if any.
    async fn call(&self, request: SoapRequest) -> Result<Option<SoapNode>, ServiceError> {
        let envelope = request.to_xml()?;
        debug!("Request dump:\n{}", envelope);

        let reply = self
            .transport
            .call(&self.config.endpoint, &request.action(), envelope)
            .await?;
        debug!("Response dump ({}):\n{}", reply.status, reply.body);

        decode_reply(&reply)
    }

    /// Get the accounts list.
    ///
    /// # Returns
    ///
    /// The accounts in the order the server sent them. The response may wrap
    /// them in a collection element, list them directly or be a single account.
    pub async fn try_list_accounts(&self) -> Result<Vec<Account>, ServiceError> {
        let request = SoapRequest::new(&self.config.namespace, GET_ACCOUNTS_OPERATION);

        let accounts = match self.call(request).await? {
            Some(response) => decode_accounts(&response),
            None => Vec::new(),
        };
        debug!("Decoded {} accounts", accounts.len());

        Ok(accounts)
    }

    /// Same as `try_list_accounts`, an empty list on any failure.
    pub async fn list_accounts(&self) -> Vec<Account> {
        self.try_list_accounts().await.unwrap_or_else(|e| {
            error!("{} failed: {}", GET_ACCOUNTS_OPERATION, e);
            Vec::new()
        })
    }

    /// Create an account.
    ///
    /// # Arguments
    ///
    /// * `balance` - Initial balance, not validated client side.
    /// * `kind` - The type of account.
    ///
    /// # Returns
    ///
    /// `true` when the server answered with a value. This does not prove the
    /// account was created.
    pub async fn try_create_account(
        &self,
        balance: f64,
        kind: AccountType,
    ) -> Result<bool, ServiceError> {
        // The service expects {}solde and {}type, not namespaced elements
        let request = SoapRequest::new(&self.config.namespace, CREATE_ACCOUNT_OPERATION)
            .with_unqualified_property("solde", balance)
            .with_unqualified_property("type", kind.wire_name());

        let created = self
            .call(request)
            .await?
            .is_some_and(|response| SoapValue::of(&response).is_some());
        if created {
            info!("Created {} account with balance {}", kind, balance);
        }

        Ok(created)
    }

    /// Same as `try_create_account`, `false` on any failure.
    pub async fn create_account(&self, balance: f64, kind: AccountType) -> bool {
        self.try_create_account(balance, kind)
            .await
            .unwrap_or_else(|e| {
                error!("{} failed: {}", CREATE_ACCOUNT_OPERATION, e);
                false
            })
    }

    /// Create an account from a draft. The draft must not carry an id yet.
    pub async fn create(&self, draft: &Account) -> bool {
        if let Some(id) = draft.id() {
            error!("Account {} already exists, refusing to create it again", id);
            return false;
        }
        self.create_account(draft.balance(), draft.kind()).await
    }

    /// Delete an account by its id.
    ///
    /// # Returns
    ///
    /// The boolean the server answered, `false` when the answer isn't one.
    pub async fn try_delete_account(&self, id: i64) -> Result<bool, ServiceError> {
        let request = SoapRequest::new(&self.config.namespace, DELETE_ACCOUNT_OPERATION)
            .with_property("id", id)
            .with_explicit_types();

        let deleted = self
            .call(request)
            .await?
            .is_some_and(|response| SoapValue::of(&response).is_some_and(|v| v.as_bool()));
        if deleted {
            info!("Deleted account {}", id);
        }

        Ok(deleted)
    }

    /// Same as `try_delete_account`, `false` on any failure.
    pub async fn delete_account(&self, id: i64) -> bool {
        self.try_delete_account(id).await.unwrap_or_else(|e| {
            error!("{} failed: {}", DELETE_ACCOUNT_OPERATION, e);
            false
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use chrono::{Local, NaiveDate};

    use super::*;
    use crate::client::transport::{
        tests::{closed_endpoint, serve_once},
        SoapReply,
    };
    use crate::constants::NAMESPACE;

    /// Replies with a fixed answer and keeps every (action, envelope) it was sent.
    struct CannedTransport {
        reply: SoapReply,
        sent: Mutex<Vec<(String, String)>>,
    }

    impl CannedTransport {
        fn ok(body: String) -> Self {
            CannedTransport {
                reply: SoapReply { status: 200, body },
                sent: Mutex::new(Vec::new()),
            }
        }

        fn with_status(status: u16, body: String) -> Self {
            CannedTransport {
                reply: SoapReply { status, body },
                sent: Mutex::new(Vec::new()),
            }
        }

        fn last_sent(&self) -> (String, String) {
            self.sent.lock().unwrap().last().cloned().unwrap()
        }
    }

    impl SoapTransport for CannedTransport {
        async fn call(
            &self,
            _endpoint: &str,
            action: &str,
            envelope: String,
        ) -> Result<SoapReply, ServiceError> {
            self.sent
                .lock()
                .unwrap()
                .push((action.to_string(), envelope));
            Ok(self.reply.clone())
        }
    }

    fn client(transport: CannedTransport) -> AccountServiceClient<CannedTransport> {
        AccountServiceClient::with_transport(ServiceConfig::default(), transport)
    }

    fn envelope(body: &str) -> String {
        format!(
            r#"<?xml version='1.0' encoding='UTF-8'?><S:Envelope xmlns:S="http://schemas.xmlsoap.org/soap/envelope/"><S:Body>{body}</S:Body></S:Envelope>"#
        )
    }

    fn list_response(inner: &str) -> String {
        envelope(&format!(
            r#"<ns2:getComptesResponse xmlns:ns2="http://ws.tp12_webservicesoap.tp.com/">{inner}</ns2:getComptesResponse>"#
        ))
    }

    const FAULT: &str = "<S:Fault><faultcode>S:Server</faultcode><faultstring>java.lang.NullPointerException</faultstring></S:Fault>";

    #[tokio::test]
    async fn test_list_accounts() {
        let transport = CannedTransport::ok(list_response(
            "<return><dateCreation>2024-05-02T00:00:00+02:00</dateCreation><id>1</id><solde>100.0</solde><type>COURANT</type></return>\
             <return><dateCreation>2024-06-10T09:30:00+02:00</dateCreation><id>2</id><solde>250.5</solde><type>EPARGNE</type></return>",
        ));
        let client = client(transport);

        let accounts = client.list_accounts().await;
        assert_eq!(
            accounts,
            vec![
                Account::new(
                    Some(1),
                    100.0,
                    NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
                    AccountType::Current
                ),
                Account::new(
                    Some(2),
                    250.5,
                    NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
                    AccountType::Savings
                ),
            ]
        );

        let (action, sent) = client.transport.last_sent();
        assert_eq!(action, format!("{NAMESPACE}getComptes"));
        assert!(sent.contains(&format!(r#"<tns:getComptes xmlns:tns="{NAMESPACE}"/>"#)));
    }

    #[tokio::test]
    async fn test_list_accounts_shapes_agree() {
        let account = "<id>4</id><solde>10</solde><dateCreation>2022-12-24</dateCreation><type>EPARGNE</type>";
        let wrapped = client(CannedTransport::ok(list_response(&format!(
            "<comptes><compte>{account}</compte></comptes>"
        ))))
        .list_accounts()
        .await;
        let bare = client(CannedTransport::ok(list_response(&format!(
            "<return>{account}</return>"
        ))))
        .list_accounts()
        .await;
        let single = client(CannedTransport::ok(list_response(account)))
            .list_accounts()
            .await;

        assert_eq!(wrapped.len(), 1);
        assert_eq!(wrapped, bare);
        assert_eq!(wrapped, single);
        assert_eq!(wrapped[0].id(), Some(4));
    }

    #[tokio::test]
    async fn test_list_accounts_fails_soft() {
        let client_with_fault = client(CannedTransport::with_status(500, envelope(FAULT)));
        assert!(matches!(
            client_with_fault.try_list_accounts().await,
            Err(ServiceError::Fault { .. })
        ));
        assert!(client_with_fault.list_accounts().await.is_empty());

        let garbage = client(CannedTransport::ok("<html>maintenance".to_string()));
        assert!(garbage.list_accounts().await.is_empty());

        let empty = client(CannedTransport::ok(envelope("")));
        assert!(empty.try_list_accounts().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_accounts_missing_fields() {
        let transport = CannedTransport::ok(list_response(
            "<return><id>n/a</id><type>COMPTE_TITRES</type></return>",
        ));
        let before = Local::now().date_naive();
        let accounts = client(transport).list_accounts().await;
        let after = Local::now().date_naive();

        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].id(), None);
        assert_eq!(accounts[0].balance(), 0.0);
        assert_eq!(accounts[0].kind(), AccountType::Current);
        assert!(accounts[0].creation_date() >= before && accounts[0].creation_date() <= after);
    }

    #[tokio::test]
    async fn test_create_account() {
        let transport = CannedTransport::ok(envelope(
            r#"<ns2:createCompteResponse xmlns:ns2="http://ws.tp12_webservicesoap.tp.com/"><return><id>9</id><solde>1500.25</solde><type>EPARGNE</type></return></ns2:createCompteResponse>"#,
        ));
        let client = client(transport);

        assert!(client.create_account(1500.25, AccountType::Savings).await);

        let (action, sent) = client.transport.last_sent();
        assert_eq!(action, format!("{NAMESPACE}createCompte"));
        assert!(sent.contains("<solde>1500.25</solde><type>EPARGNE</type>"));
        assert!(!sent.contains("tns:solde"));
        assert!(!sent.contains("tns:type"));
    }

    #[tokio::test]
    async fn test_create_account_without_value() {
        let client = client(CannedTransport::ok(envelope(
            r#"<ns2:createCompteResponse xmlns:ns2="http://ws.tp12_webservicesoap.tp.com/"/>"#,
        )));
        assert!(!client.create_account(10.0, AccountType::Current).await);
    }

    #[tokio::test]
    async fn test_create_account_text_only_value() {
        let client = client(CannedTransport::ok(envelope(
            r#"<ns2:createCompteResponse xmlns:ns2="http://ws.tp12_webservicesoap.tp.com/">42</ns2:createCompteResponse>"#,
        )));
        assert!(client.create_account(1.0, AccountType::Current).await);
    }

    #[tokio::test]
    async fn test_create_account_nil_value() {
        let client = client(CannedTransport::ok(envelope(
            r#"<ns2:createCompteResponse xmlns:ns2="http://ws.tp12_webservicesoap.tp.com/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"><return xsi:nil="true"/></ns2:createCompteResponse>"#,
        )));
        assert!(!client.create_account(1.0, AccountType::Current).await);
    }

    #[tokio::test]
    async fn test_create_account_fault() {
        let client = client(CannedTransport::with_status(500, envelope(FAULT)));
        assert!(!client.create_account(10.0, AccountType::Current).await);
    }

    #[tokio::test]
    async fn test_create_refuses_existing_account() {
        let client = client(CannedTransport::ok(envelope("<r><return>1</return></r>")));
        let existing = Account::new(
            Some(3),
            1.0,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            AccountType::Current,
        );
        assert!(!client.create(&existing).await);
        assert!(client.transport.sent.lock().unwrap().is_empty());

        assert!(client.create(&Account::draft(5.0, AccountType::Savings)).await);
    }

    #[tokio::test]
    async fn test_create_account_network_failure() {
        let config = ServiceConfig::default()
            .with_endpoint(&closed_endpoint().await)
            .with_timeout(Duration::from_secs(5));
        let client = AccountServiceClient::with_config(config);

        assert!(!client.create_account(100.0, AccountType::Current).await);
        assert!(matches!(
            client.try_create_account(100.0, AccountType::Current).await,
            Err(ServiceError::Transport(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_account_values() {
        let cases = [
            (r#"<return xsi:type="xsd:boolean">true</return>"#, true),
            (r#"<return xsi:type="xsd:string">true</return>"#, true),
            ("<return>true</return>", true),
            ("<return>TRUE</return>", true),
            (r#"<return xsi:type="xsd:boolean">false</return>"#, false),
            (r#"<return xsi:type="xsd:string">false</return>"#, false),
            ("<return>false</return>", false),
            ("<return>yes</return>", false),
            ("<return><id>1</id></return>", false),
            ("", false),
        ];

        for (value, expected) in cases {
            let client = client(CannedTransport::ok(envelope(&format!(
                r#"<ns2:deleteCompteResponse xmlns:ns2="http://ws.tp12_webservicesoap.tp.com/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">{value}</ns2:deleteCompteResponse>"#
            ))));
            assert_eq!(client.delete_account(42).await, expected, "{value}");
        }
    }

    #[tokio::test]
    async fn test_delete_account_request() {
        let client = client(CannedTransport::ok(envelope(
            "<deleteCompteResponse><return>true</return></deleteCompteResponse>",
        )));
        assert!(client.delete_account(42).await);

        let (action, sent) = client.transport.last_sent();
        assert_eq!(action, format!("{NAMESPACE}deleteCompte"));
        assert!(sent.contains(r#"<tns:id xsi:type="xsd:long">42</tns:id>"#));
    }

    #[tokio::test]
    async fn test_delete_account_malformed_or_absent() {
        assert!(!client(CannedTransport::ok("not xml at all".to_string()))
            .delete_account(1)
            .await);
        assert!(!client(CannedTransport::ok(envelope("")))
            .delete_account(1)
            .await);
        assert!(!client(CannedTransport::with_status(404, String::new()))
            .delete_account(1)
            .await);
    }

    #[tokio::test]
    async fn test_round_trip_over_http() {
        let body = list_response(
            "<return><id>1</id><solde>100.0</solde><dateCreation>2024-01-01T00:00:00Z</dateCreation><type>COURANT</type></return>",
        );
        let (url, server) = serve_once("200 OK", body).await;
        let client = AccountServiceClient::with_config(ServiceConfig::default().with_endpoint(&url));

        let accounts = client.list_accounts().await;
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].id(), Some(1));

        let request = server.await.unwrap();
        assert!(request
            .to_lowercase()
            .contains("soapaction: http://ws.tp12_webservicesoap.tp.com/getcomptes\r\n"));
    }
}
