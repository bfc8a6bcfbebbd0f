//! Attribute keys written by the instrumented agent runtime.

pub const PROMPT_USER: &str = "agk.prompt.user";
pub const PROMPT_SYSTEM: &str = "agk.prompt.system";
pub const LLM_RESPONSE: &str = "agk.llm.response";
pub const LLM_MODEL: &str = "agk.llm.model";
pub const LLM_PROVIDER: &str = "agk.llm.provider";
pub const TOOL_ARGUMENTS: &str = "agk.tool.arguments";
pub const TOOL_RESULT: &str = "agk.tool.result";
pub const TOOL_NAME: &str = "agk.tool.name";
pub const AGENT_NAME: &str = "agk.agent.name";
pub const WORKFLOW_STEP_NAME: &str = "agk.workflow.step_name";
pub const WORKFLOW_STEP_INDEX: &str = "agk.workflow.step_index";

/// Token totals have been written under two spellings over time.
pub const USAGE_TOTAL_TOKENS: &str = "llm.usage.total_tokens";
pub const STREAM_TOKENS: &str = "agk.stream.tokens";
pub const TOKEN_KEYS: [&str; 2] = [USAGE_TOTAL_TOKENS, STREAM_TOKENS];

pub const USAGE_PROMPT_TOKENS: &str = "llm.usage.prompt_tokens";
pub const USAGE_COMPLETION_TOKENS: &str = "llm.usage.completion_tokens";
pub const GENERIC_MODEL: &str = "llm.model";
pub const REQUEST_MESSAGES: &str = "llm.request.messages";
pub const FINISH_REASON: &str = "llm.response.finish_reason";
pub const TIME_TO_FIRST_TOKEN: &str = "llm.time_to_first_token";

/// Keys surfaced in the explorer's metadata panel, in display order.
pub const IMPORTANT: [&str; 18] = [
    LLM_PROVIDER,
    LLM_MODEL,
    "agk.llm.max_tokens",
    "agk.llm.temperature",
    STREAM_TOKENS,
    "agk.llm.latency_ms",
    WORKFLOW_STEP_NAME,
    WORKFLOW_STEP_INDEX,
    "agk.workflow.mode",
    "agk.workflow.success",
    "agk.workflow.latency_ms",
    "agk.workflow.id",
    "agk.tools.count",
    TOOL_NAME,
    "http.status_code",
    "llm.streaming",
    "error.message",
    "error.type",
];
