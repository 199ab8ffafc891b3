//! Shared plan documents for tests.

use serde_json::{Value, json};

use crate::plan::PlanDocument;

/// Builds a plan document from a JSON literal.
pub(crate) fn plan_from(value: Value) -> PlanDocument {
    serde_json::from_value(value).expect("fixture is a valid plan")
}

/// A root module with `variable "region"`, `resource "x" "a"` repeated twice
/// and reading `var.region`, and a non-repeated `module "net"`.
pub(crate) fn scenario_plan() -> PlanDocument {
    plan_from(json!({
        "format_version": "1.2",
        "terraform_version": "1.7.5",
        "variables": {"region": {"value": "eu-west-1"}},
        "configuration": {"root_module": {
            "variables": {
                "region": {"pos": {"filename": "main.tf", "line": 1}}
            },
            "resources": [{
                "address": "x.a",
                "mode": "managed",
                "type": "x",
                "name": "a",
                "provider_config_key": "x",
                "expressions": {"region": {"references": ["var.region"]}},
                "count_expression": {"constant_value": 2},
                "pos": {"filename": "main.tf", "line": 5}
            }],
            "module_calls": {"net": {
                "source": "./net",
                "pos": {"filename": "main.tf", "line": 10},
                "module": {
                    "resources": [{
                        "address": "y.b",
                        "mode": "managed",
                        "type": "y",
                        "name": "b",
                        "pos": {"filename": "main.tf", "line": 1}
                    }]
                }
            }}
        }},
        "planned_values": {"root_module": {
            "resources": [
                {"address": "x.a[0]", "mode": "managed", "type": "x", "name": "a", "index": 0,
                 "values": {"region": "eu-west-1"}},
                {"address": "x.a[1]", "mode": "managed", "type": "x", "name": "a", "index": 1,
                 "values": {"region": "eu-west-1"}}
            ],
            "child_modules": [{
                "address": "module.net",
                "resources": [
                    {"address": "module.net.y.b", "mode": "managed", "type": "y", "name": "b",
                     "values": {}}
                ]
            }]
        }},
        "resource_changes": [
            {"address": "x.a[0]", "mode": "managed", "type": "x", "name": "a", "index": 0,
             "change": {"actions": ["create"], "before": null, "after": {"region": "eu-west-1"}}},
            {"address": "x.a[1]", "mode": "managed", "type": "x", "name": "a", "index": 1,
             "change": {"actions": ["create"], "before": null, "after": {"region": "eu-west-1"}}},
            {"address": "module.net.y.b", "module_address": "module.net", "mode": "managed",
             "type": "y", "name": "b", "change": {"actions": ["update"], "before": {}, "after": {}}}
        ],
        "output_changes": {
            "secret": {"actions": ["create"], "before": null, "after": "s3cr3t",
                       "after_sensitive": true}
        }
    }))
}
