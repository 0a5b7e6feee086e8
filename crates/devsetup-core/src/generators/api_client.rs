//! Typed fetch wrapper for calling the project's backend

use super::lib_dir;
use crate::context::{Context, Framework};

pub fn client_path(ctx: &Context) -> String {
    format!("{}/api-client.ts", lib_dir(ctx))
}

pub fn error_path(ctx: &Context) -> String {
    format!("{}/api-error.ts", lib_dir(ctx))
}

/// Expression reading the API base URL from the framework's public env
fn base_url_expr(framework: Framework) -> &'static str {
    match framework {
        Framework::Nextjs => "process.env.NEXT_PUBLIC_API_URL",
        Framework::ViteTanstackRouter => "import.meta.env.VITE_API_URL",
    }
}

pub fn client(ctx: &Context) -> String {
    format!(
        r#"import {{ ApiError }} from "./api-error";

const BASE_URL = {base_url} ?? "";

type RequestOptions = Omit<RequestInit, "body"> & {{
  body?: unknown;
  query?: Record<string, string | number | boolean | undefined>;
}};

function buildUrl(path: string, query?: RequestOptions["query"]): string {{
  const url = new URL(path, BASE_URL || window.location.origin);
  for (const [key, value] of Object.entries(query ?? {{}})) {{
    if (value !== undefined) url.searchParams.set(key, String(value));
  }}
  return url.toString();
}}

export async function request<T>(path: string, options: RequestOptions = {{}}): Promise<T> {{
  const {{ body, query, headers, ...init }} = options;
  const response = await fetch(buildUrl(path, query), {{
    ...init,
    headers: {{
      "Content-Type": "application/json",
      ...headers,
    }},
    body: body === undefined ? undefined : JSON.stringify(body),
  }});

  if (!response.ok) {{
    throw await ApiError.fromResponse(response);
  }}
  if (response.status === 204) {{
    return undefined as T;
  }}
  return (await response.json()) as T;
}}

export const api = {{
  get: <T>(path: string, options?: RequestOptions) =>
    request<T>(path, {{ ...options, method: "GET" }}),
  post: <T>(path: string, body?: unknown, options?: RequestOptions) =>
    request<T>(path, {{ ...options, method: "POST", body }}),
  put: <T>(path: string, body?: unknown, options?: RequestOptions) =>
    request<T>(path, {{ ...options, method: "PUT", body }}),
  patch: <T>(path: string, body?: unknown, options?: RequestOptions) =>
    request<T>(path, {{ ...options, method: "PATCH", body }}),
  delete: <T>(path: string, options?: RequestOptions) =>
    request<T>(path, {{ ...options, method: "DELETE" }}),
}};
"#,
        base_url = base_url_expr(ctx.framework),
    )
}
