//! 配置校验模块
//!
//! 校验规则：
//! - appender 名称非空且唯一
//! - gate 引用的 appender 存在
//! - file appender 必须提供 path 参数
//! - composite filter 不能为空

use std::collections::HashSet;

use contracts::{AppenderKind, ContractError, DeliveryBlueprint, FilterConfig};

use crate::Section;

/// 校验 DeliveryBlueprint 配置
///
/// 返回第一个遇到的错误，或 Ok(())。错误字段以条目标签开头，
/// 例如 `[[gates]] #1 (appender = "file") filter`。
pub fn validate(blueprint: &DeliveryBlueprint) -> Result<(), ContractError> {
    validate_appenders(blueprint)?;
    validate_gates(blueprint)?;
    Ok(())
}

/// 校验 appender 名称、类型参数与自身 filter
fn validate_appenders(blueprint: &DeliveryBlueprint) -> Result<(), ContractError> {
    let mut seen = HashSet::new();
    for (idx, appender) in blueprint.appenders.iter().enumerate() {
        if appender.name.is_empty() {
            return Err(ContractError::config_validation(
                format!("{} name", Section::Appenders.label(idx, None)),
                "appender name cannot be empty",
            ));
        }
        let label = Section::Appenders.label(idx, Some(&appender.name));
        if !seen.insert(appender.name.as_str()) {
            return Err(ContractError::config_validation(
                label,
                "duplicate appender name",
            ));
        }
        if appender.kind == AppenderKind::File
            && appender.params.get("path").map_or(true, |p| p.is_empty())
        {
            return Err(ContractError::config_validation(
                format!("{label} params.path"),
                "file appender requires a non-empty 'path' parameter",
            ));
        }
        if let Some(filter) = &appender.filter {
            validate_filter(&format!("{label} filter"), filter)?;
        }
    }
    Ok(())
}

/// 校验 gate 引用与 filter
fn validate_gates(blueprint: &DeliveryBlueprint) -> Result<(), ContractError> {
    for (idx, gate) in blueprint.gates.iter().enumerate() {
        let label = Section::Gates.label(idx, Some(&gate.appender));
        if blueprint.appender(&gate.appender).is_none() {
            return Err(ContractError::config_validation(
                label,
                format!("appender '{}' not found", gate.appender),
            ));
        }
        if let Some(filter) = &gate.filter {
            validate_filter(&format!("{label} filter"), filter)?;
        }
    }
    Ok(())
}

fn validate_filter(field: &str, filter: &FilterConfig) -> Result<(), ContractError> {
    match filter {
        FilterConfig::Composite { filters } => {
            if filters.is_empty() {
                return Err(ContractError::config_validation(
                    field,
                    "composite filter must contain at least one filter",
                ));
            }
            for (idx, child) in filters.iter().enumerate() {
                validate_filter(&format!("{field}.filters[{idx}]"), child)?;
            }
            Ok(())
        }
        FilterConfig::LoggerName { prefix, .. } if prefix.is_empty() => Err(
            ContractError::config_validation(field, "logger_name prefix cannot be empty"),
        ),
        _ => Ok(()),
    }
}
