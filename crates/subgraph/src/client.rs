//! The public read API.
//!
//! [`SubgraphClient`] composes the pieces of one call: validate inputs, build
//! a [`GroupQuery`], hand its text to the [`Transport`], normalize the answer.
//! Each operation issues exactly one transport call.

use tracing::{debug, instrument, warn};

use crate::normalize::{decode_group_ids, decode_groups, normalize_groups, normalize_single};
use crate::validation::{expect_non_empty, ParamKind};
use crate::{
    network, Endpoint, Group, GroupId, GroupOptions, GroupQuery, RequestId, SubgraphError,
    Transport,
};

/// Read-only client for one subgraph endpoint.
#[derive(Debug, Clone)]
pub struct SubgraphClient<T> {
    endpoint: Endpoint,
    transport: T,
}

impl<T: Transport> SubgraphClient<T> {
    /// Creates a client for the deployment on `network`.
    ///
    /// # Errors
    ///
    /// [`SubgraphError::UnsupportedNetwork`] if `network` is not a known name.
    pub fn new(network: &str, transport: T) -> Result<Self, SubgraphError> {
        let endpoint = network::resolve_endpoint(network)?;
        Ok(Self::with_endpoint(endpoint, transport))
    }

    /// Creates a client for an explicit endpoint (e.g. a self-hosted indexer).
    pub fn with_endpoint(endpoint: Endpoint, transport: T) -> Self {
        Self {
            endpoint,
            transport,
        }
    }

    /// The endpoint this client queries.
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Returns the ids of every group, in service order.
    #[instrument(skip_all, fields(request_id = %RequestId::new_random(), endpoint = %self.endpoint))]
    pub async fn get_group_ids(&self) -> Result<Vec<GroupId>, SubgraphError> {
        let data = self.run(&GroupQuery::ids()).await?;
        let ids = decode_group_ids(data)?;
        debug!(count = ids.len(), "fetched group ids");
        Ok(ids)
    }

    /// Returns every group matching `options.filters`.
    #[instrument(skip_all, fields(request_id = %RequestId::new_random(), endpoint = %self.endpoint))]
    pub async fn get_groups(&self, options: &GroupOptions) -> Result<Vec<Group>, SubgraphError> {
        let data = self.run(&GroupQuery::collection(options)).await?;
        let groups = normalize_groups(decode_groups(data)?, options)?;
        debug!(count = groups.len(), "fetched groups");
        Ok(groups)
    }

    /// Returns the group with `group_id`, or `None` if the service has none.
    ///
    /// # Errors
    ///
    /// [`SubgraphError::InvalidParameter`] if `group_id` is empty.
    #[instrument(skip_all, fields(request_id = %RequestId::new_random(), endpoint = %self.endpoint, group_id = %group_id))]
    pub async fn get_group(
        &self,
        group_id: &str,
        options: &GroupOptions,
    ) -> Result<Option<Group>, SubgraphError> {
        let id = parse_group_id(group_id)?;

        let data = self.run(&GroupQuery::single(&id, options)).await?;
        let group = normalize_single(decode_groups(data)?, options)?;
        if group.is_none() {
            debug!("group not found");
        }
        Ok(group)
    }

    /// Returns `true` if `member` (an identity commitment) belongs to `group_id`.
    ///
    /// # Errors
    ///
    /// [`SubgraphError::InvalidParameter`] if either argument is empty.
    #[instrument(skip_all, fields(request_id = %RequestId::new_random(), endpoint = %self.endpoint, group_id = %group_id))]
    pub async fn is_group_member(
        &self,
        group_id: &str,
        member: &str,
    ) -> Result<bool, SubgraphError> {
        let id = parse_group_id(group_id)?;
        let member = expect_non_empty(member, "member")?;

        let data = self.run(&GroupQuery::membership(&id, member)).await?;
        Ok(!decode_group_ids(data)?.is_empty())
    }

    async fn run(&self, query: &GroupQuery) -> Result<serde_json::Value, SubgraphError> {
        let text = query.render();
        debug!(query = %text, "executing subgraph query");
        self.transport
            .execute(&self.endpoint, &text)
            .await
            .map_err(|e| {
                warn!(error = %e, "subgraph transport failed");
                SubgraphError::from(e)
            })
    }
}

fn parse_group_id(group_id: &str) -> Result<GroupId, SubgraphError> {
    GroupId::new(group_id)
        .ok_or_else(|| SubgraphError::invalid_parameter("groupId", ParamKind::NonEmptyString))
}
