//! Line-oriented JSON command dispatcher.
//!
//! Each input line is one [`InboundCommand`]; each produces exactly one
//! output line holding an [`Outbound`] outcome. Commands carry the session
//! they arrived on, standing in for the RPC layer's session handle.
//!
//! ```text
//! {"command":"arm_fail_safe","session":{"session_type":"pase","fabric_index":0,"peer_node_id":0},"request":{"expiry_length_seconds":60,"breadcrumb":1}}
//! {"outcome":"response","response":{"error_code":"Ok","debug_text":null}}
//! ```

use gc_core::commissioning::{
    ArmFailSafeRequest, AttributeId, AttributeValue, CommandResult, CommandStatus,
    CommissioningCompleteRequest, CommissioningResponse, SetRegulatoryConfigRequest,
    SetTcAcknowledgementsRequest,
};
use gc_core::fail_safe::FailSafeState;
use gc_core::{FabricIndex, SessionDescriptor};
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

use crate::bootstrap::CommissioningRuntime;

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum InboundCommand {
    ArmFailSafe {
        session: SessionDescriptor,
        request: ArmFailSafeRequest,
    },
    SetRegulatoryConfig {
        session: SessionDescriptor,
        request: SetRegulatoryConfigRequest,
    },
    SetTcAcknowledgements {
        session: SessionDescriptor,
        request: SetTcAcknowledgementsRequest,
    },
    CommissioningComplete {
        session: SessionDescriptor,
        #[serde(default)]
        request: CommissioningCompleteRequest,
    },
    ReadAttribute {
        attribute: AttributeId,
    },
    ReadAttributes,
    FailSafeState,
    /// Operational credentials stand-in: stage a fabric and flag AddNOC.
    AddNoc {
        fabric_index: FabricIndex,
    },
    /// Operational credentials stand-in: flag UpdateNOC.
    UpdateNoc,
    OpenCommissioningWindow,
    CloseCommissioningWindow,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outbound {
    /// Cluster response of a command.
    Response { response: CommissioningResponse },
    /// Interaction-level status in place of a cluster response.
    Status { status: CommandStatus },
    Attribute { value: AttributeValue },
    Attributes { values: Vec<AttributeValue> },
    FailSafe { state: FailSafeState },
    Ack,
    Error { message: String },
}

impl Outbound {
    fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }
}

impl From<CommandResult> for Outbound {
    fn from(result: CommandResult) -> Self {
        match result {
            Ok(response) => Self::Response { response },
            Err(status) => Self::Status { status },
        }
    }
}

/// Feeds decoded commands to the general commissioning server.
pub struct CommandDispatcher {
    runtime: CommissioningRuntime,
}

impl CommandDispatcher {
    pub fn new(runtime: CommissioningRuntime) -> Self {
        Self { runtime }
    }

    pub fn runtime(&self) -> &CommissioningRuntime {
        &self.runtime
    }

    pub async fn dispatch(&self, command: InboundCommand) -> Outbound {
        let server = &self.runtime.server;
        match command {
            InboundCommand::ArmFailSafe { session, request } => {
                server.arm_fail_safe(&session, request).await.into()
            }
            InboundCommand::SetRegulatoryConfig { session, request } => {
                server.set_regulatory_config(&session, request).await.into()
            }
            InboundCommand::SetTcAcknowledgements { session, request } => {
                server.set_tc_acknowledgements(&session, request).await.into()
            }
            InboundCommand::CommissioningComplete { session, request } => {
                server.commissioning_complete(&session, request).await.into()
            }
            InboundCommand::ReadAttribute { attribute } => {
                match server.read_attribute(attribute).await {
                    Ok(value) => Outbound::Attribute { value },
                    Err(err) => Outbound::error(format!("{:#}", anyhow::Error::from(err))),
                }
            }
            InboundCommand::ReadAttributes => match server.read_attributes().await {
                Ok(values) => Outbound::Attributes { values },
                Err(err) => Outbound::error(format!("{:#}", anyhow::Error::from(err))),
            },
            InboundCommand::FailSafeState => Outbound::FailSafe {
                state: server.fail_safe_state().await,
            },
            InboundCommand::AddNoc { fabric_index } => self.add_noc(fabric_index).await,
            InboundCommand::UpdateNoc => {
                let armed = server
                    .update_fail_safe(|fail_safe| {
                        let armed = fail_safe.is_fail_safe_armed();
                        if armed {
                            fail_safe.set_update_noc_command_invoked();
                        }
                        armed
                    })
                    .await;
                if armed {
                    Outbound::Ack
                } else {
                    Outbound::error("fail-safe is not armed")
                }
            }
            InboundCommand::OpenCommissioningWindow => {
                self.runtime.commissioning_window.open();
                Outbound::Ack
            }
            InboundCommand::CloseCommissioningWindow => {
                self.runtime.commissioning_window.close();
                Outbound::Ack
            }
        }
    }

    async fn add_noc(&self, fabric_index: FabricIndex) -> Outbound {
        if !fabric_index.is_defined() {
            return Outbound::error("fabric index 0 is reserved");
        }
        let fabric_table = &self.runtime.fabric_table;
        let armed = self
            .runtime
            .server
            .update_fail_safe_then(
                |fail_safe| {
                    let armed = matches!(fail_safe.state(), FailSafeState::Armed { .. });
                    if armed {
                        fail_safe.set_add_noc_command_invoked(fabric_index);
                    }
                    armed
                },
                |armed| async move {
                    if armed {
                        fabric_table.stage_pending_fabric(fabric_index).await;
                    }
                },
            )
            .await;
        if armed {
            Outbound::Ack
        } else {
            Outbound::error("fail-safe is not armed")
        }
    }

    /// Decode and dispatch one line. Malformed input yields an error outcome.
    pub async fn dispatch_line(&self, line: &str) -> Outbound {
        match serde_json::from_str::<InboundCommand>(line) {
            Ok(command) => {
                debug!(?command, "dispatching command");
                self.dispatch(command).await
            }
            Err(err) => {
                warn!(error = %err, "rejected malformed command line");
                Outbound::error(format!("malformed command: {err}"))
            }
        }
    }

    /// Serve commands from `reader` until EOF, one response line per
    /// non-empty input line.
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> anyhow::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let outbound = self.dispatch_line(line).await;
            let mut encoded = serde_json::to_vec(&outbound)?;
            encoded.push(b'\n');
            writer.write_all(&encoded).await?;
            writer.flush().await?;
        }
        Ok(())
    }
}
