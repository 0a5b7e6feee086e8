//! VS Code workspace settings

use crate::context::{Context, Tooling};
use serde_json::json;

pub fn settings(ctx: &Context) -> String {
    let value = match ctx.tooling {
        Tooling::Biome => json!({
            "editor.defaultFormatter": "biomejs.biome",
            "editor.formatOnSave": true,
            "editor.codeActionsOnSave": {
                "quickfix.biome": "explicit",
                "source.organizeImports.biome": "explicit"
            },
            "typescript.tsdk": "node_modules/typescript/lib"
        }),
        Tooling::EslintPrettier => json!({
            "editor.defaultFormatter": "esbenp.prettier-vscode",
            "editor.formatOnSave": true,
            "editor.codeActionsOnSave": {
                "source.fixAll.eslint": "explicit"
            },
            "eslint.useFlatConfig": true,
            "typescript.tsdk": "node_modules/typescript/lib"
        }),
    };
    format!("{:#}\n", value)
}

pub fn extensions(ctx: &Context) -> String {
    let recommendations = match ctx.tooling {
        Tooling::Biome => json!(["biomejs.biome"]),
        Tooling::EslintPrettier => json!(["dbaeumer.vscode-eslint", "esbenp.prettier-vscode"]),
    };
    format!("{:#}\n", json!({ "recommendations": recommendations }))
}
