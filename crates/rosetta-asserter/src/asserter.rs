use std::collections::{HashMap, HashSet};
use std::path::Path;

use rosetta_types::{
    ApiError, BlockIdentifier, NetworkIdentifier, NetworkOptionsResponse, NetworkStatusResponse,
    OperationStatus,
};
use tracing::debug;

use crate::checks::{self, ERRORS, OPERATION_STATUSES, OPERATION_TYPES};
use crate::config::AsserterConfig;
use crate::error::{AsserterError, Result};
use crate::snapshot::FileConfiguration;

/// Accepted capability declaration for one client session.
///
/// Only obtainable through a constructor that validated the declaration.
/// Immutable; rebuild it to pick up new capabilities.
#[derive(Debug, Clone)]
pub struct Asserter {
    network: NetworkIdentifier,
    genesis_block: BlockIdentifier,
    operation_statuses: HashMap<String, bool>,
    operation_types: HashSet<String>,
    errors: HashMap<i32, Vec<ApiError>>,
}

/// Everything an [`Asserter`] accepted, with the allow-lists as sets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfiguration {
    pub network: NetworkIdentifier,
    pub genesis_block: BlockIdentifier,
    pub operation_types: HashSet<String>,
    pub operation_statuses: HashSet<OperationStatus>,
    pub errors: HashSet<ApiError>,
}

impl Asserter {
    /// Build from live `/network/status` and `/network/options` responses
    /// using the default config.
    pub fn from_responses(
        network: &NetworkIdentifier,
        status: &NetworkStatusResponse,
        options: &NetworkOptionsResponse,
    ) -> Result<Self> {
        Self::from_responses_with_config(network, status, options, &AsserterConfig::default())
    }

    /// Build from live responses using explicit config.
    pub fn from_responses_with_config(
        network: &NetworkIdentifier,
        status: &NetworkStatusResponse,
        options: &NetworkOptionsResponse,
        config: &AsserterConfig,
    ) -> Result<Self> {
        checks::network_identifier(network)?;

        let genesis = checks::block_identifier(
            "genesis_block_identifier",
            status.genesis_block_identifier.as_ref(),
        )?;
        checks::block_identifier(
            "current_block_identifier",
            status.current_block_identifier.as_ref(),
        )?;
        checks::timestamp(status.current_block_timestamp, config.min_unix_epoch)?;
        checks::peers(&status.peers)?;

        let allow = options
            .allow
            .as_ref()
            .ok_or(AsserterError::MissingField("allow"))?;
        let asserter = Self::from_allow_lists(
            network,
            genesis,
            &allow.operation_statuses,
            &allow.operation_types,
            &allow.errors,
        )?;

        checks::version(options.version.as_ref())?;

        Ok(asserter)
    }

    /// Build from a snapshot file using the default config.
    pub fn from_snapshot_file(path: &Path) -> Result<Self> {
        Self::from_snapshot_file_with_config(path, &AsserterConfig::default())
    }

    /// Build from a snapshot file using explicit config.
    pub fn from_snapshot_file_with_config(path: &Path, config: &AsserterConfig) -> Result<Self> {
        let snapshot = FileConfiguration::load_with_config(path, config)?;
        Self::from_snapshot(&snapshot)
    }

    /// Build from an already-parsed snapshot.
    ///
    /// Snapshots carry no current block, so only the network, genesis block,
    /// and allow-lists are checked.
    pub fn from_snapshot(snapshot: &FileConfiguration) -> Result<Self> {
        let network = snapshot
            .network_identifier
            .as_ref()
            .ok_or(AsserterError::MissingField("network_identifier"))?;
        checks::network_identifier(network)?;

        let genesis = checks::block_identifier(
            "genesis_block_identifier",
            snapshot.genesis_block_identifier.as_ref(),
        )?;

        Self::from_allow_lists(
            network,
            genesis,
            &snapshot.allowed_operation_statuses,
            &snapshot.allowed_operation_types,
            &snapshot.allowed_errors,
        )
    }

    fn from_allow_lists(
        network: &NetworkIdentifier,
        genesis: &BlockIdentifier,
        statuses: &[OperationStatus],
        types: &[String],
        errors: &[ApiError],
    ) -> Result<Self> {
        let operation_statuses = checks::operation_statuses(statuses)?;
        let operation_types = checks::operation_types(types)?;
        let errors = checks::errors(errors)?;

        debug!(
            blockchain = %network.blockchain,
            network = %network.network,
            genesis_index = genesis.index,
            statuses = operation_statuses.len(),
            types = operation_types.len(),
            error_codes = errors.len(),
            "accepted capability declaration"
        );

        Ok(Self {
            network: network.clone(),
            genesis_block: genesis.clone(),
            operation_statuses,
            operation_types,
            errors,
        })
    }

    /// Owned copy of everything this asserter accepted.
    pub fn configuration(&self) -> ClientConfiguration {
        ClientConfiguration {
            network: self.network.clone(),
            genesis_block: self.genesis_block.clone(),
            operation_types: self.operation_types.clone(),
            operation_statuses: self
                .operation_statuses
                .iter()
                .map(|(status, successful)| OperationStatus::new(status.clone(), *successful))
                .collect(),
            errors: self.errors.values().flatten().cloned().collect(),
        }
    }

    /// Persistable form of this asserter, with lists in a stable order.
    pub fn snapshot(&self) -> FileConfiguration {
        let mut types: Vec<String> = self.operation_types.iter().cloned().collect();
        types.sort_unstable();

        let mut statuses: Vec<OperationStatus> = self
            .operation_statuses
            .iter()
            .map(|(status, successful)| OperationStatus::new(status.clone(), *successful))
            .collect();
        statuses.sort_unstable_by(|a, b| a.status.cmp(&b.status));

        let mut codes: Vec<i32> = self.errors.keys().copied().collect();
        codes.sort_unstable();
        let errors = codes
            .iter()
            .filter_map(|code| self.errors.get(code))
            .flatten()
            .cloned()
            .collect();

        FileConfiguration {
            network_identifier: Some(self.network.clone()),
            genesis_block_identifier: Some(self.genesis_block.clone()),
            allowed_operation_types: types,
            allowed_operation_statuses: statuses,
            allowed_errors: errors,
        }
    }

    pub fn network(&self) -> &NetworkIdentifier {
        &self.network
    }

    pub fn genesis_block(&self) -> &BlockIdentifier {
        &self.genesis_block
    }

    pub fn supports_operation_type(&self, kind: &str) -> bool {
        self.operation_types.contains(kind)
    }

    /// Check an operation status from a response.
    ///
    /// `None` is accepted: operations in a construction preview have no
    /// status yet.
    pub fn operation_status(&self, status: Option<&str>) -> Result<()> {
        match status {
            Some(status) => self.operation_successful(status).map(|_| ()),
            None => Ok(()),
        }
    }

    /// Whether a declared status counts as successful.
    pub fn operation_successful(&self, status: &str) -> Result<bool> {
        self.operation_statuses
            .get(status)
            .copied()
            .ok_or_else(|| AsserterError::NotDeclared {
                list: OPERATION_STATUSES,
                value: status.to_string(),
            })
    }

    pub fn operation_type(&self, kind: &str) -> Result<()> {
        if self.supports_operation_type(kind) {
            Ok(())
        } else {
            Err(AsserterError::NotDeclared {
                list: OPERATION_TYPES,
                value: kind.to_string(),
            })
        }
    }

    /// Check an error returned by the server.
    ///
    /// The code must be declared, and one declaration with that code must
    /// carry the same message and retriable flag. `description` is free-form
    /// and not compared.
    pub fn api_error(&self, err: &ApiError) -> Result<()> {
        let declared = self
            .errors
            .get(&err.code)
            .ok_or_else(|| AsserterError::NotDeclared {
                list: ERRORS,
                value: err.code.to_string(),
            })?;

        let same_message: Vec<&ApiError> = declared
            .iter()
            .filter(|candidate| candidate.message == err.message)
            .collect();
        if same_message.is_empty() {
            return Err(AsserterError::ErrorMismatch {
                code: err.code,
                reason: format!("undeclared message '{}'", err.message),
            });
        }
        if !same_message
            .iter()
            .any(|candidate| candidate.retriable == err.retriable)
        {
            return Err(AsserterError::ErrorMismatch {
                code: err.code,
                reason: format!("retriable={} not declared", err.retriable),
            });
        }
        Ok(())
    }

    /// Check that a response names the network this asserter accepted.
    pub fn network_identifier(&self, network: &NetworkIdentifier) -> Result<()> {
        checks::network_identifier(network)?;
        if *network != self.network {
            return Err(AsserterError::NetworkMismatch {
                expected: describe_network(&self.network),
                found: describe_network(network),
            });
        }
        Ok(())
    }
}

fn describe_network(network: &NetworkIdentifier) -> String {
    match &network.sub_network_identifier {
        Some(sub) => format!("{}:{}:{}", network.blockchain, network.network, sub.network),
        None => format!("{}:{}", network.blockchain, network.network),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use rosetta_types::{Allow, Peer, Version};

    use super::*;
    use crate::config::MIN_UNIX_EPOCH;

    fn network() -> NetworkIdentifier {
        NetworkIdentifier::new("hello", "world")
    }

    fn status() -> NetworkStatusResponse {
        NetworkStatusResponse {
            current_block_identifier: Some(BlockIdentifier::new(100, "block 100")),
            current_block_timestamp: MIN_UNIX_EPOCH + 1,
            genesis_block_identifier: Some(BlockIdentifier::new(0, "block 0")),
            peers: vec![Peer::new("peer 1")],
        }
    }

    fn options_with(allow: Allow) -> NetworkOptionsResponse {
        NetworkOptionsResponse {
            version: Some(Version {
                rosetta_version: "1.2.3".to_string(),
                node_version: "1.0".to_string(),
                middleware_version: None,
            }),
            allow: Some(allow),
        }
    }

    fn options() -> NetworkOptionsResponse {
        options_with(Allow {
            operation_statuses: vec![OperationStatus::new("Success", true)],
            operation_types: vec!["Transfer".to_string()],
            errors: vec![ApiError::new(1, "error", true)],
            historical_balance_lookup: false,
        })
    }

    fn asserter() -> Asserter {
        Asserter::from_responses(&network(), &status(), &options()).unwrap()
    }

    #[test]
    fn valid_responses_build_asserter() {
        let config = asserter().configuration();

        assert_eq!(config.network, network());
        assert_eq!(config.genesis_block, BlockIdentifier::new(0, "block 0"));
        assert_eq!(
            config.operation_types,
            HashSet::from(["Transfer".to_string()])
        );
        assert_eq!(
            config.operation_statuses,
            HashSet::from([OperationStatus::new("Success", true)])
        );
        assert_eq!(config.errors, HashSet::from([ApiError::new(1, "error", true)]));
    }

    #[test]
    fn empty_network_rejected_first() {
        let mut status = status();
        status.genesis_block_identifier = None;

        let result =
            Asserter::from_responses(&NetworkIdentifier::new("", "world"), &status, &options());
        assert!(matches!(
            result,
            Err(AsserterError::MissingField("network_identifier.blockchain"))
        ));
    }

    #[test]
    fn missing_genesis_rejected() {
        let mut status = status();
        status.genesis_block_identifier = None;

        let err = Asserter::from_responses(&network(), &status, &options()).unwrap_err();
        assert!(matches!(err, AsserterError::MissingField(field) if field.contains("genesis")));
    }

    #[test]
    fn missing_current_block_rejected() {
        let mut status = status();
        status.current_block_identifier = None;

        assert!(matches!(
            Asserter::from_responses(&network(), &status, &options()),
            Err(AsserterError::MissingField("current_block_identifier"))
        ));
    }

    #[test]
    fn timestamp_at_threshold_rejected() {
        let mut status = status();
        status.current_block_timestamp = MIN_UNIX_EPOCH;

        assert!(matches!(
            Asserter::from_responses(&network(), &status, &options()),
            Err(AsserterError::ImplausibleValue {
                field: "current_block_timestamp",
                ..
            })
        ));
    }

    #[test]
    fn threshold_is_injected_through_config() {
        let mut status = status();
        status.current_block_timestamp = 11;
        let config = AsserterConfig {
            min_unix_epoch: 10,
            ..AsserterConfig::default()
        };

        assert!(Asserter::from_responses(&network(), &status, &options()).is_err());
        assert!(
            Asserter::from_responses_with_config(&network(), &status, &options(), &config).is_ok()
        );
    }

    #[test]
    fn missing_allow_rejected() {
        let mut options = options();
        options.allow = None;

        assert!(matches!(
            Asserter::from_responses(&network(), &status(), &options),
            Err(AsserterError::MissingField("allow"))
        ));
    }

    #[test]
    fn absent_statuses_rejected_before_duplicate_types() {
        let options = options_with(Allow {
            operation_types: vec!["Transfer".to_string(), "Transfer".to_string()],
            ..Allow::default()
        });

        let err = Asserter::from_responses(&network(), &status(), &options).unwrap_err();
        assert!(matches!(err, AsserterError::EmptyRequiredSet(OPERATION_STATUSES)));
        assert_eq!(err.to_string(), "no allow.operation_statuses found");
    }

    #[test]
    fn duplicate_statuses_rejected() {
        let options = options_with(Allow {
            operation_statuses: vec![
                OperationStatus::new("Success", true),
                OperationStatus::new("Success", false),
            ],
            operation_types: vec!["Transfer".to_string()],
            ..Allow::default()
        });

        let err = Asserter::from_responses(&network(), &status(), &options).unwrap_err();
        assert!(matches!(
            &err,
            AsserterError::DuplicateEntry { list: OPERATION_STATUSES, value } if value == "Success"
        ));
    }

    #[test]
    fn duplicate_types_rejected() {
        let options = options_with(Allow {
            operation_statuses: vec![OperationStatus::new("Success", true)],
            operation_types: vec!["Transfer".to_string(), "Transfer".to_string()],
            ..Allow::default()
        });

        let err = Asserter::from_responses(&network(), &status(), &options).unwrap_err();
        assert_eq!(
            err.to_string(),
            "allow.operation_types contains a duplicate Transfer"
        );
    }

    #[test]
    fn missing_version_rejected() {
        let mut options = options();
        options.version = None;

        assert!(matches!(
            Asserter::from_responses(&network(), &status(), &options),
            Err(AsserterError::MissingField("version"))
        ));
    }

    #[test]
    fn extra_fields_dropped() {
        let mut options = options();
        if let Some(allow) = options.allow.as_mut() {
            allow.historical_balance_lookup = true;
        }
        let mut status = status();
        status.peers.push(Peer::new("peer 2"));

        let with_extras = Asserter::from_responses(&network(), &status, &options).unwrap();
        assert_eq!(with_extras.configuration(), asserter().configuration());
    }

    #[test]
    fn operation_status_membership() {
        let asserter = asserter();

        assert!(asserter.operation_status(Some("Success")).is_ok());
        assert!(asserter.operation_status(None).is_ok());
        assert!(asserter.operation_successful("Success").unwrap());

        let err = asserter.operation_status(Some("Reverted")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Reverted is not declared in allow.operation_statuses"
        );
    }

    #[test]
    fn operation_type_membership() {
        let asserter = asserter();

        assert!(asserter.operation_type("Transfer").is_ok());
        assert!(asserter.supports_operation_type("Transfer"));
        assert!(matches!(
            asserter.operation_type("Stake"),
            Err(AsserterError::NotDeclared { list: OPERATION_TYPES, value }) if value == "Stake"
        ));
    }

    #[test]
    fn api_error_must_match_declaration() {
        let asserter = asserter();

        assert!(asserter.api_error(&ApiError::new(1, "error", true)).is_ok());

        let mut described = ApiError::new(1, "error", true);
        described.description = Some("extra context".to_string());
        assert!(asserter.api_error(&described).is_ok());

        assert!(matches!(
            asserter.api_error(&ApiError::new(2, "error", true)),
            Err(AsserterError::NotDeclared { list: ERRORS, .. })
        ));
        assert!(matches!(
            asserter.api_error(&ApiError::new(1, "different", true)),
            Err(AsserterError::ErrorMismatch { code: 1, .. })
        ));
        assert!(matches!(
            asserter.api_error(&ApiError::new(1, "error", false)),
            Err(AsserterError::ErrorMismatch { code: 1, .. })
        ));
    }

    #[test]
    fn api_error_accepts_any_declaration_sharing_a_code() {
        let options = options_with(Allow {
            operation_statuses: vec![OperationStatus::new("Success", true)],
            operation_types: vec![],
            errors: vec![
                ApiError::new(5, "busy", true),
                ApiError::new(5, "gone", false),
            ],
            historical_balance_lookup: false,
        });
        let asserter = Asserter::from_responses(&network(), &status(), &options).unwrap();

        assert!(asserter.api_error(&ApiError::new(5, "busy", true)).is_ok());
        assert!(asserter.api_error(&ApiError::new(5, "gone", false)).is_ok());
        assert!(asserter.api_error(&ApiError::new(5, "gone", true)).is_err());
        assert_eq!(asserter.configuration().errors.len(), 2);
    }

    #[test]
    fn network_identifier_must_match() {
        let asserter = asserter();

        assert!(asserter.network_identifier(&network()).is_ok());

        let err = asserter
            .network_identifier(&NetworkIdentifier::new("hello", "testnet"))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "network hello:testnet does not match hello:world"
        );
    }

    #[test]
    fn snapshot_lists_are_sorted() {
        let options = options_with(Allow {
            operation_statuses: vec![
                OperationStatus::new("Success", true),
                OperationStatus::new("Failure", false),
            ],
            operation_types: vec!["Transfer".to_string(), "Fee".to_string()],
            errors: vec![
                ApiError::new(9, "late", false),
                ApiError::new(1, "early", true),
            ],
            historical_balance_lookup: false,
        });
        let snapshot = Asserter::from_responses(&network(), &status(), &options)
            .unwrap()
            .snapshot();

        assert_eq!(snapshot.allowed_operation_types, vec!["Fee", "Transfer"]);
        assert_eq!(snapshot.allowed_operation_statuses[0].status, "Failure");
        assert_eq!(snapshot.allowed_errors[0].code, 1);
        assert_eq!(snapshot.allowed_errors[1].code, 9);
    }

    #[test]
    fn shared_across_threads() {
        let asserter = Arc::new(asserter());

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let asserter = Arc::clone(&asserter);
                thread::spawn(move || {
                    asserter.operation_type("Transfer").is_ok()
                        && asserter.operation_status(Some("Success")).is_ok()
                })
            })
            .collect();

        for handle in handles {
            assert!(handle.join().unwrap());
        }
    }
}
