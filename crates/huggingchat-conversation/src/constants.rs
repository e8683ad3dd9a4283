//! Constants for the HuggingChat Conversation integration

pub const DOMAIN: &str = "huggingchat_conversation";

/// Title of every entry this integration creates
pub const ENTRY_TITLE: &str = "HuggingChat Conversation";

/// Version stamped on created entries
pub const CONFIG_FLOW_VERSION: u32 = 1;

/// The single error code shown when signing in fails for any reason
pub const ERROR_INVALID_AUTH: &str = "invalid_auth";

pub const CONF_EMAIL: &str = "email";
pub const DEFAULT_EMAIL: &str = "YOUR_EMAIL";
pub const CONF_PASSWORD: &str = "password";
pub const DEFAULT_PASSWORD: &str = "YOUR_PASSWORD";

/// Ordinal index into the service's model list
pub const CONF_CHAT_MODEL: &str = "chat_model";
pub const DEFAULT_CHAT_MODEL: u32 = 0;
/// Highest selectable model index
pub const MAX_CHAT_MODEL: u32 = 4;

pub const CONF_PROMPT: &str = "prompt";
pub const DEFAULT_PROMPT: &str = r#"This smart home is controlled by Home Assistant.

An overview of the areas and the devices in this smart home:
{%- for area in areas() %}
  {%- set area_info = namespace(printed=false) %}
  {%- if not area_info.printed %}

{{ area_name(area) }}:
        {%- set area_info.printed = true %}
  {%- endif %}
  {%- if area_devices(area) %}
- Devices:
    {%- for device in area_devices(area) -%}
      {%- if not device_attr(device, "disabled_by") and not device_attr(device, "entry_type") and device_attr(device, "name") %}
  - {{ device_attr(device, "name") }}{% if device_attr(device, "model") and (device_attr(device, "model") | string) not in (device_attr(device, "name") | string) %} ({{ device_attr(device, "model") }}){% endif %}
      {%- endif %}
    {%- endfor %}
  {%- else %}
No devices in this area
  {%- endif %}

  {%- if area_entities(area) %}

- Entities
    {%- for entity in area_entities(area) | reject('is_hidden_entity') -%}
      {%- if not entity.is_hidden_entity %}
  - {{ state_attr(entity, 'friendly_name') }} ({{ entity }}){%- if states(entity) != "unknown" %}: {{ states(entity) }}{% endif %}
      {%- endif %}
    {%- endfor %}
  {%- else %}

No entities in this area
  {%- endif %}
{%- endfor %}

Answer the user's questions about the world truthfully.

If the user wants to control a device, reject the request and suggest using the Home Assistant app.
"#;

pub const CONF_MAX_TOKENS: &str = "max_tokens";
pub const DEFAULT_MAX_TOKENS: i64 = 150;

pub const CONF_TOP_P: &str = "top_p";
pub const DEFAULT_TOP_P: f64 = 1.0;

pub const CONF_TEMPERATURE: &str = "temperature";
pub const DEFAULT_TEMPERATURE: f64 = 0.5;

/// Step size of the `top_p` and `temperature` sliders
pub const SAMPLING_STEP: f64 = 0.05;
