//! Store service task and its cloneable handle.
//!
//! The task exclusively owns a [`ResourceTree`] and processes commands one at
//! a time, so there is no locking anywhere. Mutating commands are validated
//! against the tree as they arrive and answered right away with a pending
//! operation; the mutation itself travels back through the same command
//! channel as an [`StoreCommand::Apply`] message scheduled for later, which
//! keeps deferred writes ordered with ordinary commands.

use std::time::Duration;

use serde_json::Value;
use tokio::sync::{mpsc, oneshot};

use fleetmock_core::namegen::{self, HOST_NAME_LEN, OPERATION_NAME_LEN};
use fleetmock_core::{Group, Host, HostView, Operation, ResourceTree, StoreError};

use crate::scheduler::Scheduler;

/// Capacity for the store command channel.
const COMMAND_CHANNEL_CAPACITY: usize = 64;

/// How long each kind of mutation stays pending before it lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockDelays {
    pub create_host: Duration,
    pub delete_host: Duration,
    pub create_group: Duration,
    pub delete_group: Duration,
}

impl Default for MockDelays {
    fn default() -> Self {
        MockDelays {
            create_host: Duration::from_secs(1),
            delete_host: Duration::from_secs(1),
            create_group: Duration::from_secs(3),
            delete_group: Duration::from_secs(10),
        }
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// A validated write waiting for its delay to elapse. Targets are re-resolved
/// by name when the write lands, never by positions captured earlier.
enum Mutation {
    AddHost { zone: String, host: Host },
    RemoveHost { zone: String, host: String },
    AddGroup { zone: String, host: String, group: Group },
    RemoveGroup { zone: String, host: String, group: String },
}

/// Commands processed by the store task.
enum StoreCommand {
    ListZones {
        reply: oneshot::Sender<Vec<String>>,
    },
    ListHosts {
        zone: String,
        reply: oneshot::Sender<Result<Vec<HostView>, StoreError>>,
    },
    ListGroups {
        zone: String,
        host: String,
        reply: oneshot::Sender<Result<Vec<Group>, StoreError>>,
    },
    CreateHost {
        zone: String,
        gcp: Value,
        reply: oneshot::Sender<Result<Operation, StoreError>>,
    },
    DeleteHost {
        zone: String,
        host: String,
        reply: oneshot::Sender<Result<Operation, StoreError>>,
    },
    CreateGroup {
        zone: String,
        host: String,
        group: Group,
        reply: oneshot::Sender<Result<Operation, StoreError>>,
    },
    DeleteGroup {
        zone: String,
        host: String,
        group: String,
        reply: oneshot::Sender<Result<Operation, StoreError>>,
    },
    Reset {
        reply: oneshot::Sender<()>,
    },
    /// Scheduled follow-up carrying a mutation whose delay has elapsed.
    Apply(Mutation),
}

// ---------------------------------------------------------------------------
// Handle
// ---------------------------------------------------------------------------

/// Cloneable handle to the store task.
#[derive(Clone)]
pub struct StoreHandle {
    tx: mpsc::Sender<StoreCommand>,
}

impl StoreHandle {
    /// Spawn the store task on the current runtime, seeded with the canned
    /// dataset, and return a handle to it.
    pub fn spawn(delays: MockDelays) -> Self {
        let (tx, rx) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);
        let scheduler = Scheduler::new(tx.clone());
        tokio::spawn(run(rx, scheduler, delays));
        StoreHandle { tx }
    }

    /// Zone names in seed order.
    pub async fn zones(&self) -> Result<Vec<String>, StoreError> {
        let (reply, reply_rx) = oneshot::channel();
        self.tx
            .send(StoreCommand::ListZones { reply })
            .await
            .map_err(|_| StoreError::Unavailable)?;
        reply_rx.await.map_err(|_| StoreError::Unavailable)
    }

    /// Hosts of a zone in their listing shape.
    pub async fn hosts(&self, zone: &str) -> Result<Vec<HostView>, StoreError> {
        let (reply, reply_rx) = oneshot::channel();
        self.tx
            .send(StoreCommand::ListHosts {
                zone: zone.to_string(),
                reply,
            })
            .await
            .map_err(|_| StoreError::Unavailable)?;
        reply_rx.await.map_err(|_| StoreError::Unavailable)?
    }

    /// Groups of a host, devices included.
    pub async fn groups(&self, zone: &str, host: &str) -> Result<Vec<Group>, StoreError> {
        let (reply, reply_rx) = oneshot::channel();
        self.tx
            .send(StoreCommand::ListGroups {
                zone: zone.to_string(),
                host: host.to_string(),
                reply,
            })
            .await
            .map_err(|_| StoreError::Unavailable)?;
        reply_rx.await.map_err(|_| StoreError::Unavailable)?
    }

    /// Accept a host creation. The host gets a generated name and appears in
    /// listings once the create delay elapses.
    pub async fn create_host(&self, zone: &str, gcp: Value) -> Result<Operation, StoreError> {
        let (reply, reply_rx) = oneshot::channel();
        self.tx
            .send(StoreCommand::CreateHost {
                zone: zone.to_string(),
                gcp,
                reply,
            })
            .await
            .map_err(|_| StoreError::Unavailable)?;
        reply_rx.await.map_err(|_| StoreError::Unavailable)?
    }

    /// Accept a host deletion.
    pub async fn delete_host(&self, zone: &str, host: &str) -> Result<Operation, StoreError> {
        let (reply, reply_rx) = oneshot::channel();
        self.tx
            .send(StoreCommand::DeleteHost {
                zone: zone.to_string(),
                host: host.to_string(),
                reply,
            })
            .await
            .map_err(|_| StoreError::Unavailable)?;
        reply_rx.await.map_err(|_| StoreError::Unavailable)?
    }

    /// Accept a group creation with the client-supplied group record.
    pub async fn create_group(
        &self,
        zone: &str,
        host: &str,
        group: Group,
    ) -> Result<Operation, StoreError> {
        let (reply, reply_rx) = oneshot::channel();
        self.tx
            .send(StoreCommand::CreateGroup {
                zone: zone.to_string(),
                host: host.to_string(),
                group,
                reply,
            })
            .await
            .map_err(|_| StoreError::Unavailable)?;
        reply_rx.await.map_err(|_| StoreError::Unavailable)?
    }

    /// Accept a group deletion.
    pub async fn delete_group(
        &self,
        zone: &str,
        host: &str,
        group: &str,
    ) -> Result<Operation, StoreError> {
        let (reply, reply_rx) = oneshot::channel();
        self.tx
            .send(StoreCommand::DeleteGroup {
                zone: zone.to_string(),
                host: host.to_string(),
                group: group.to_string(),
                reply,
            })
            .await
            .map_err(|_| StoreError::Unavailable)?;
        reply_rx.await.map_err(|_| StoreError::Unavailable)?
    }

    /// Reload the seed dataset immediately. Mutations already accepted keep
    /// their schedule and land on the fresh tree.
    pub async fn reset(&self) -> Result<(), StoreError> {
        let (reply, reply_rx) = oneshot::channel();
        self.tx
            .send(StoreCommand::Reset { reply })
            .await
            .map_err(|_| StoreError::Unavailable)?;
        reply_rx.await.map_err(|_| StoreError::Unavailable)
    }
}

// ---------------------------------------------------------------------------
// Store task
// ---------------------------------------------------------------------------

async fn run(
    mut commands: mpsc::Receiver<StoreCommand>,
    scheduler: Scheduler<StoreCommand>,
    delays: MockDelays,
) {
    let mut tree = ResourceTree::seeded();
    while let Some(cmd) = commands.recv().await {
        handle_command(&mut tree, &scheduler, &delays, cmd);
    }
}

fn handle_command(
    tree: &mut ResourceTree,
    scheduler: &Scheduler<StoreCommand>,
    delays: &MockDelays,
    cmd: StoreCommand,
) {
    match cmd {
        StoreCommand::ListZones { reply } => {
            let _ = reply.send(tree.zone_names());
        }
        StoreCommand::ListHosts { zone, reply } => {
            let result = tree.host_views(&zone).ok_or(StoreError::ZoneNotFound(zone));
            let _ = reply.send(result);
        }
        StoreCommand::ListGroups { zone, host, reply } => {
            let result = if !tree.contains_zone(&zone) {
                Err(StoreError::ZoneNotFound(zone))
            } else {
                match tree.find_host(&zone, &host) {
                    Some(record) => Ok(record.groups.clone()),
                    None => Err(StoreError::HostNotFound(host)),
                }
            };
            let _ = reply.send(result);
        }
        StoreCommand::CreateHost { zone, gcp, reply } => {
            let result = if tree.contains_zone(&zone) {
                let host = Host {
                    name: namegen::host_name(HOST_NAME_LEN),
                    gcp,
                    groups: Vec::new(),
                };
                Ok(accept(
                    scheduler,
                    delays.create_host,
                    Mutation::AddHost { zone, host },
                ))
            } else {
                Err(StoreError::ZoneNotFound(zone))
            };
            let _ = reply.send(result);
        }
        StoreCommand::DeleteHost { zone, host, reply } => {
            let result = if !tree.contains_zone(&zone) {
                Err(StoreError::ZoneNotFound(zone))
            } else if tree.find_host(&zone, &host).is_none() {
                Err(StoreError::HostNotFound(host))
            } else {
                Ok(accept(
                    scheduler,
                    delays.delete_host,
                    Mutation::RemoveHost { zone, host },
                ))
            };
            let _ = reply.send(result);
        }
        StoreCommand::CreateGroup {
            zone,
            host,
            group,
            reply,
        } => {
            let result = if !tree.contains_zone(&zone) {
                Err(StoreError::ZoneNotFound(zone))
            } else if tree.find_host(&zone, &host).is_none() {
                Err(StoreError::HostNotFound(host))
            } else {
                Ok(accept(
                    scheduler,
                    delays.create_group,
                    Mutation::AddGroup { zone, host, group },
                ))
            };
            let _ = reply.send(result);
        }
        StoreCommand::DeleteGroup {
            zone,
            host,
            group,
            reply,
        } => {
            let result = if !tree.contains_zone(&zone) {
                Err(StoreError::ZoneNotFound(zone))
            } else if tree.find_host(&zone, &host).is_none() {
                Err(StoreError::HostNotFound(host))
            } else if tree.find_group(&zone, &host, &group).is_none() {
                Err(StoreError::GroupNotFound(group))
            } else {
                Ok(accept(
                    scheduler,
                    delays.delete_group,
                    Mutation::RemoveGroup { zone, host, group },
                ))
            };
            let _ = reply.send(result);
        }
        StoreCommand::Reset { reply } => {
            tree.reset();
            tracing::info!("store reset to seed data");
            let _ = reply.send(());
        }
        StoreCommand::Apply(mutation) => apply_mutation(tree, mutation),
    }
}

/// Mint a pending operation for a validated mutation and put the mutation on
/// the schedule.
fn accept(scheduler: &Scheduler<StoreCommand>, delay: Duration, mutation: Mutation) -> Operation {
    let operation = Operation::pending(namegen::operation_name(OPERATION_NAME_LEN));
    tracing::debug!(
        operation = %operation.name,
        delay_ms = delay.as_millis() as u64,
        "mutation accepted"
    );
    scheduler.schedule(StoreCommand::Apply(mutation), delay);
    operation
}

/// Land a mutation whose delay has elapsed. Targets that disappeared while
/// the mutation was pending are skipped with a warning.
fn apply_mutation(tree: &mut ResourceTree, mutation: Mutation) {
    match mutation {
        Mutation::AddHost { zone, host } => {
            let name = host.name.clone();
            if tree.add_host(&zone, host) {
                tracing::debug!(%zone, host = %name, "host created");
            } else {
                tracing::warn!(%zone, host = %name, "deferred host create dropped: zone is gone");
            }
        }
        Mutation::RemoveHost { zone, host } => {
            if tree.remove_host(&zone, &host).is_some() {
                tracing::debug!(%zone, %host, "host deleted");
            } else {
                tracing::warn!(%zone, %host, "deferred host delete dropped: host is gone");
            }
        }
        Mutation::AddGroup { zone, host, group } => {
            let name = group.name.clone();
            if tree.add_group(&zone, &host, group) {
                tracing::debug!(%zone, %host, group = %name, "group created");
            } else {
                tracing::warn!(%zone, %host, group = %name, "deferred group create dropped: host is gone");
            }
        }
        Mutation::RemoveGroup { zone, host, group } => {
            if tree.remove_group(&zone, &host, &group).is_some() {
                tracing::debug!(%zone, %host, %group, "group deleted");
            } else {
                tracing::warn!(%zone, %host, %group, "deferred group delete dropped: group is gone");
            }
        }
    }
}
