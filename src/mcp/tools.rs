//! MCP Tool definitions and handlers
//!
//! Defines all available tools and their implementations.

use std::time::Instant;

use schemars::gen::SchemaSettings;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{error, info};
use validator::Validate;

use crate::bank::operations;
use crate::bank::requests::{
    ApplyTermDepositArgs, ExecuteTransferArgs, ObtainSecondPasswordArgs, OtpDeviceCheckArgs,
    PreTransferPrepArgs, ReviewTransferArgs, TermDepositPrepArgs, ThreatmetrixRiskArgs,
    UpdateHighRiskAuthStatusArgs,
};
use crate::error::McpError;
use crate::mcp::types::{CallToolResult, Tool};

type ToolResult = std::result::Result<CallToolResult, McpError>;

/// Tool handler
#[derive(Debug, Clone, Default)]
pub struct ToolHandler {
    log_calls: bool,
}

impl ToolHandler {
    /// Create a new tool handler
    pub fn new() -> Self {
        Self::default()
    }

    /// Log start, completion and failure of every tool call
    pub fn with_call_logging(mut self) -> Self {
        self.log_calls = true;
        self
    }

    /// List all available tools
    pub fn list_tools(&self) -> Vec<Tool> {
        vec![
            tool_def(
                "otp_device_check",
                "OTPデバイス種別確認",
                "振り込みできる条件かどうかを確認します。お客様が紙のご利用カードを利用している場合は利用可能ではありません。入力はユーザーID、出力は利用可能なら true、不可なら false を返します。",
                input_schema::<OtpDeviceCheckArgs>(),
            ),
            tool_def(
                "pre_transfer_prep",
                "振込事前処理",
                "振り込み事前処理を確認するためにユーザーの各種情報を返します。登録振込先・出金口座・限度額/手数料を返します。インプットはユーザーIDです。",
                input_schema::<PreTransferPrepArgs>(),
            ),
            tool_def(
                "review_transfer",
                "振込内容照会",
                "ユーザーID・出金口座情報・振込先を入力として、残高・限度額・手数料の最終チェックを行い、確認した内容をそのまま応答します（モック）。",
                input_schema::<ReviewTransferArgs>(),
            ),
            tool_def(
                "threatmetrix_risk",
                "ThreatMetrixリスク判定",
                "ユーザーID（任意のセッションIDと併用可）を基に端末・行動シグナルを評価し、低/中/高のリスク評価を返します。",
                input_schema::<ThreatmetrixRiskArgs>(),
            ),
            tool_def(
                "obtain_second_password",
                "第2暗証取得",
                "ユーザーIDを基に第2暗証の承認フローを開始し、端末側承認後のトークンを返します。",
                input_schema::<ObtainSecondPasswordArgs>(),
            ),
            tool_def(
                "execute_transfer",
                "振込実行",
                "ユーザーID・出金口座・振込先・金額（および必要に応じて第2暗証トークン/OTP）を受け取り、送金実行結果を返します。",
                input_schema::<ExecuteTransferArgs>(),
            ),
            tool_def(
                "update_high_risk_auth_status",
                "高リスク履歴の認証ステータス更新",
                "ユーザーIDとケースIDを指定して、メールOTP等の照合結果に基づく認証ステータスを更新します。",
                input_schema::<UpdateHighRiskAuthStatusArgs>(),
            ),
            tool_def(
                "term_deposit_prep",
                "定期移管事前処理",
                "ユーザーID・出金口座・金額（任意の商品/期間指定を含む）を基に、残高・商品条件・リスク観点の事前チェック結果を返します。",
                input_schema::<TermDepositPrepArgs>(),
            ),
            tool_def(
                "apply_term_deposit",
                "定期預金申込",
                "ユーザーID・出金口座・金額・期間等の条件を入力として、定期預金の申込結果を返します。",
                input_schema::<ApplyTermDepositArgs>(),
            ),
        ]
    }

    /// Call a tool by name
    ///
    /// Arguments that do not match the tool's input shape are rejected before the
    /// operation runs.
    pub async fn call_tool(&self, name: &str, args: Value) -> ToolResult {
        if !self.log_calls {
            return self.dispatch(name, args).await;
        }

        info!(tool = name, args = %args, "[MCP] {} start", name);
        let started = Instant::now();
        let result = self.dispatch(name, args).await;
        let ms = started.elapsed().as_millis() as u64;

        match &result {
            Ok(_) => info!(tool = name, ms, "[MCP] {} ok", name),
            Err(e) => error!(tool = name, ms, error = %e, "[MCP] {} error", name),
        }

        result
    }

    async fn dispatch(&self, name: &str, args: Value) -> ToolResult {
        match name {
            "otp_device_check" => self.handle_otp_device_check(args).await,
            "pre_transfer_prep" => self.handle_pre_transfer_prep(args).await,
            "review_transfer" => self.handle_review_transfer(args).await,
            "threatmetrix_risk" => self.handle_threatmetrix_risk(args).await,
            "obtain_second_password" => self.handle_obtain_second_password(args).await,
            "execute_transfer" => self.handle_execute_transfer(args).await,
            "update_high_risk_auth_status" => self.handle_update_high_risk_auth_status(args).await,
            "term_deposit_prep" => self.handle_term_deposit_prep(args).await,
            "apply_term_deposit" => self.handle_apply_term_deposit(args).await,
            _ => Err(McpError::UnknownTool {
                name: name.to_string(),
            }),
        }
    }

    // ==================== Tool Handlers ====================

    async fn handle_otp_device_check(&self, args: Value) -> ToolResult {
        let args: OtpDeviceCheckArgs = parse_args("otp_device_check", args)?;
        envelope(&operations::otp_device_check(args))
    }

    async fn handle_pre_transfer_prep(&self, args: Value) -> ToolResult {
        let args: PreTransferPrepArgs = parse_args("pre_transfer_prep", args)?;
        envelope(&operations::pre_transfer_prep(args))
    }

    async fn handle_review_transfer(&self, args: Value) -> ToolResult {
        let args: ReviewTransferArgs = parse_args("review_transfer", args)?;
        envelope(&operations::review_transfer(args))
    }

    async fn handle_threatmetrix_risk(&self, args: Value) -> ToolResult {
        let args: ThreatmetrixRiskArgs = parse_args("threatmetrix_risk", args)?;
        envelope(&operations::threatmetrix_risk(args))
    }

    async fn handle_obtain_second_password(&self, args: Value) -> ToolResult {
        let args: ObtainSecondPasswordArgs = parse_args("obtain_second_password", args)?;
        envelope(&operations::obtain_second_password(args))
    }

    async fn handle_execute_transfer(&self, args: Value) -> ToolResult {
        let args: ExecuteTransferArgs = parse_args("execute_transfer", args)?;
        envelope(&operations::execute_transfer(args))
    }

    async fn handle_update_high_risk_auth_status(&self, args: Value) -> ToolResult {
        let args: UpdateHighRiskAuthStatusArgs =
            parse_args("update_high_risk_auth_status", args)?;
        envelope(&operations::update_high_risk_auth_status(args))
    }

    async fn handle_term_deposit_prep(&self, args: Value) -> ToolResult {
        let args: TermDepositPrepArgs = parse_args("term_deposit_prep", args)?;
        envelope(&operations::term_deposit_prep(args))
    }

    async fn handle_apply_term_deposit(&self, args: Value) -> ToolResult {
        let args: ApplyTermDepositArgs = parse_args("apply_term_deposit", args)?;
        envelope(&operations::apply_term_deposit(args))
    }
}

// ==================== Helpers ====================

/// Deserialize and validate tool arguments. Missing arguments are read as `{}`.
fn parse_args<T>(tool: &str, args: Value) -> Result<T, McpError>
where
    T: DeserializeOwned + Validate,
{
    let args = if args.is_null() { json!({}) } else { args };

    let parsed: T = serde_json::from_value(args).map_err(|e| McpError::InvalidArguments {
        tool: tool.to_string(),
        message: e.to_string(),
    })?;

    parsed.validate().map_err(|e| McpError::InvalidArguments {
        tool: tool.to_string(),
        message: e.to_string(),
    })?;

    Ok(parsed)
}

fn envelope<T: Serialize>(payload: &T) -> ToolResult {
    CallToolResult::structured(payload).map_err(|e| McpError::ProtocolError {
        message: format!("Failed to serialize tool result: {}", e),
    })
}

/// JSON Schema for a tool's arguments, with optional fields left out of `required`
fn input_schema<T: JsonSchema>() -> Value {
    let settings = SchemaSettings::draft07().with(|s| {
        s.option_add_null_type = false;
        s.inline_subschemas = true;
    });
    let root = settings.into_generator().into_root_schema_for::<T>();

    let mut schema = serde_json::to_value(root).unwrap_or_else(|_| json!({"type": "object"}));
    if let Some(obj) = schema.as_object_mut() {
        obj.remove("$schema");
        obj.remove("title");
        obj.remove("definitions");
    }
    schema
}

fn tool_def(name: &str, title: &str, description: &str, input_schema: Value) -> Tool {
    Tool {
        name: name.to_string(),
        title: Some(title.to_string()),
        description: Some(description.to_string()),
        input_schema,
    }
}
