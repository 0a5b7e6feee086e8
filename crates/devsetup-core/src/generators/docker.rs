//! Dockerfile for the detected framework and package manager

use crate::context::{Context, Framework, PackageManager};

const NODE_IMAGE: &str = "node:22-alpine";
const BUN_IMAGE: &str = "oven/bun:1-alpine";
const NGINX_IMAGE: &str = "nginx:1.27-alpine";

/// Lockfile to copy before installing
///
/// Bun has a text (`bun.lock`) and a binary (`bun.lockb`) lockfile; whichever
/// exists in the project is used, preferring the text one.
pub fn lockfile(ctx: &Context) -> &'static str {
    match ctx.package_manager {
        PackageManager::Bun => {
            if !ctx.has_path("bun.lock") && ctx.has_path("bun.lockb") {
                "bun.lockb"
            } else {
                "bun.lock"
            }
        }
        PackageManager::Pnpm => "pnpm-lock.yaml",
        PackageManager::Yarn => "yarn.lock",
        PackageManager::Npm => "package-lock.json",
    }
}

fn base_image(pm: PackageManager) -> &'static str {
    match pm {
        PackageManager::Bun => BUN_IMAGE,
        _ => NODE_IMAGE,
    }
}

/// Extra line needed before the package manager is usable in the image
fn enable_package_manager(pm: PackageManager) -> &'static str {
    match pm {
        PackageManager::Pnpm => "RUN corepack enable pnpm\n",
        PackageManager::Yarn => "RUN corepack enable yarn\n",
        PackageManager::Bun | PackageManager::Npm => "",
    }
}

fn install_stage(ctx: &Context) -> String {
    let pm = ctx.package_manager;
    format!(
        "FROM {image} AS deps\n\
         WORKDIR /app\n\
         {enable}\
         COPY package.json {lock}* ./\n\
         RUN {install}\n",
        image = base_image(pm),
        enable = enable_package_manager(pm),
        lock = lockfile(ctx),
        install = pm.frozen_install(),
    )
}

fn build_stage(ctx: &Context) -> String {
    let pm = ctx.package_manager;
    format!(
        "FROM {image} AS build\n\
         WORKDIR /app\n\
         {enable}\
         COPY --from=deps /app/node_modules ./node_modules\n\
         COPY . .\n\
         RUN {build}\n",
        image = base_image(pm),
        enable = enable_package_manager(pm),
        build = pm.run_script("build"),
    )
}

fn nextjs_runner(pm: PackageManager) -> String {
    let (image, command) = match pm {
        PackageManager::Bun => (BUN_IMAGE, r#"["bun", "server.js"]"#),
        _ => (NODE_IMAGE, r#"["node", "server.js"]"#),
    };
    format!(
        "FROM {image} AS runner\n\
         WORKDIR /app\n\
         ENV NODE_ENV=production\n\
         ENV PORT=3000\n\
         ENV HOSTNAME=0.0.0.0\n\
         COPY --from=build /app/public ./public\n\
         COPY --from=build /app/.next/standalone ./\n\
         COPY --from=build /app/.next/static ./.next/static\n\
         EXPOSE 3000\n\
         CMD {command}\n",
    )
}

fn static_runner() -> String {
    format!(
        "FROM {NGINX_IMAGE} AS runner\n\
         COPY nginx.conf /etc/nginx/conf.d/default.conf\n\
         COPY --from=build /app/dist /usr/share/nginx/html\n\
         EXPOSE 80\n\
         CMD [\"nginx\", \"-g\", \"daemon off;\"]\n",
    )
}

/// `Dockerfile`
pub fn dockerfile(ctx: &Context) -> String {
    let runner = match ctx.framework {
        Framework::Nextjs => nextjs_runner(ctx.package_manager),
        Framework::ViteTanstackRouter => static_runner(),
    };

    [install_stage(ctx), build_stage(ctx), runner].join("\n")
}
