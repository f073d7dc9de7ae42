use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;

use crate::assets::color::AccentColor;
use crate::config::WelcomeConfig;
use crate::foundation::error::{TypebannerError, TypebannerResult};
use crate::welcome::artifact::{ArtifactGenerator, WelcomeArtifacts};

/// Chat community (server/guild) identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommunityId(pub u64);

/// Channel identifier within a community.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChannelId(pub u64);

impl fmt::Display for CommunityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The community a member joined.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Community {
    /// Community id.
    pub id: CommunityId,
    /// Display name, shown in bold in greetings.
    pub name: String,
    /// Member count after the join.
    pub member_count: u64,
}

/// The member being greeted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Member {
    /// Platform user id.
    pub id: u64,
    /// Name typed into the banner.
    pub display_name: String,
    /// Platform mention markup (e.g. `<@123>`).
    pub mention: String,
    /// Avatar image URL used as the embed thumbnail.
    pub avatar_url: Option<String>,
}

/// What the bot may do in a channel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChannelPermissions {
    /// May post messages.
    pub send_messages: bool,
    /// May upload files.
    pub attach_files: bool,
}

impl ChannelPermissions {
    /// `true` when a video greeting can be posted.
    pub fn can_greet(self) -> bool {
        self.send_messages && self.attach_files
    }
}

/// Per-community welcome channel mapping, kept in process memory.
#[derive(Debug, Default)]
pub struct WelcomeChannels {
    inner: RwLock<HashMap<CommunityId, ChannelId>>,
}

impl WelcomeChannels {
    /// Empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set (or replace) the welcome channel of `community`; returns the previous one.
    pub fn set(&self, community: CommunityId, channel: ChannelId) -> Option<ChannelId> {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(community, channel)
    }

    /// Welcome channel of `community`, if configured.
    pub fn get(&self, community: CommunityId) -> Option<ChannelId> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&community)
            .copied()
    }

    /// Forget the welcome channel of `community`.
    pub fn remove(&self, community: CommunityId) -> Option<ChannelId> {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&community)
    }

    /// Number of configured communities.
    pub fn len(&self) -> usize {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// `true` when no community is configured.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One titled block of an embed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmbedField {
    /// Field title.
    pub name: String,
    /// Field body.
    pub value: String,
    /// Rendered side by side with neighbouring inline fields.
    pub inline: bool,
}

/// Rich card posted alongside the welcome video.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GreetingEmbed {
    /// Card title.
    pub title: String,
    /// Card body.
    pub description: String,
    /// Side stripe color as `0xRRGGBB`.
    pub color: u32,
    /// Extra fields.
    pub fields: Vec<EmbedField>,
    /// Thumbnail image URL.
    pub thumbnail_url: Option<String>,
    /// Footer text.
    pub footer: String,
}

impl GreetingEmbed {
    /// Standard greeting card for `member` joining `community`.
    pub fn for_member(member: &Member, community: &Community) -> Self {
        Self {
            title: "🎉 Welcome to the Server!".to_owned(),
            description: format!(
                "Hey {}, welcome to **{}**!",
                member.mention, community.name
            ),
            color: AccentColor::MATRIX_GREEN.to_u32(),
            fields: vec![EmbedField {
                name: "📋 Getting Started".to_owned(),
                value: "• Be respectful\n• Share with everyone\n• Have fun!".to_owned(),
                inline: false,
            }],
            thumbnail_url: member.avatar_url.clone(),
            footer: format!("Member #{}", community.member_count),
        }
    }
}

/// Plain greeting used whenever the video cannot be sent.
pub fn fallback_text(member: &Member, community: &Community) -> String {
    format!("🎉 Welcome {} to **{}**!", member.mention, community.name)
}

/// Plain greeting used when the video exceeds the attachment limit.
pub fn too_large_text(member: &Member) -> String {
    format!("🎉 Welcome {}! (Video too large to send)", member.mention)
}

/// File name the video is uploaded under.
pub fn attachment_name(member: &Member) -> String {
    format!("welcome_{}.mp4", member.display_name)
}

/// Platform seam: the chat SDK adapter implements this.
#[async_trait]
pub trait GreetingTransport: Send + Sync {
    /// Permissions of the bot in `channel`; `None` when the channel no longer exists.
    async fn channel_permissions(
        &self,
        channel: ChannelId,
    ) -> TypebannerResult<Option<ChannelPermissions>>;

    /// Post `video` (uploaded as `file_name`) together with `embed`.
    async fn send_video(
        &self,
        channel: ChannelId,
        video: &Path,
        file_name: &str,
        embed: &GreetingEmbed,
    ) -> TypebannerResult<()>;

    /// Post a plain text message.
    async fn send_text(&self, channel: ChannelId, text: &str) -> TypebannerResult<()>;
}

/// Why a text greeting was sent instead of the video.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FallbackReason {
    /// The rendered video exceeded the attachment limit.
    TooLarge {
        /// Video size in bytes.
        size: u64,
        /// Configured limit in bytes.
        limit: u64,
    },
    /// Rendering or encoding failed.
    GenerationFailed(String),
    /// The platform rejected the video upload.
    SendFailed(String),
}

/// Result of one greeting attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// The video and embed were posted.
    Video {
        /// Uploaded size in bytes.
        bytes: u64,
    },
    /// A plain text greeting was posted instead.
    TextFallback {
        /// What went wrong with the video.
        reason: FallbackReason,
    },
    /// The community has no welcome channel.
    NoChannel,
    /// The configured channel no longer exists.
    ChannelMissing(ChannelId),
    /// The bot cannot post or upload in the configured channel.
    MissingPermissions(ChannelId),
}

/// Status report for one community.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WelcomeStatus {
    /// Configured welcome channel.
    pub channel: Option<ChannelId>,
    /// Configured background path.
    pub background: PathBuf,
    /// Whether the background file exists.
    pub background_present: bool,
}

/// Generates welcome videos and posts them through a [`GreetingTransport`].
pub struct WelcomeService {
    channels: WelcomeChannels,
    generator: Arc<dyn ArtifactGenerator>,
    config: WelcomeConfig,
}

impl WelcomeService {
    /// Service rendering with [`WelcomeArtifacts`] for `config`.
    pub fn new(config: WelcomeConfig) -> Self {
        let generator = Arc::new(WelcomeArtifacts::new(config.clone()));
        Self::with_generator(config, generator)
    }

    /// Service with a custom video generator.
    pub fn with_generator(config: WelcomeConfig, generator: Arc<dyn ArtifactGenerator>) -> Self {
        Self {
            channels: WelcomeChannels::new(),
            generator,
            config,
        }
    }

    /// Channel mapping.
    pub fn channels(&self) -> &WelcomeChannels {
        &self.channels
    }

    /// Configuration in use.
    pub fn config(&self) -> &WelcomeConfig {
        &self.config
    }

    /// Route greetings of `community` to `channel`, provided the bot may post videos there.
    pub fn set_welcome_channel(
        &self,
        community: CommunityId,
        channel: ChannelId,
        permissions: ChannelPermissions,
    ) -> TypebannerResult<()> {
        if !permissions.can_greet() {
            return Err(TypebannerError::validation(format!(
                "channel {channel} needs send-messages and attach-files permissions"
            )));
        }
        self.channels.set(community, channel);
        tracing::info!(%community, %channel, "welcome channel set");
        Ok(())
    }

    /// Status of `community`.
    pub fn status(&self, community: CommunityId) -> WelcomeStatus {
        WelcomeStatus {
            channel: self.channels.get(community),
            background: self.config.background.clone(),
            background_present: self.config.background_present(),
        }
    }

    /// Greet `member` in the configured channel of `community`.
    ///
    /// Communities without a channel, vanished channels and missing permissions are reported
    /// without posting anything.
    pub async fn on_member_join(
        &self,
        transport: &dyn GreetingTransport,
        community: &Community,
        member: &Member,
    ) -> TypebannerResult<DeliveryOutcome> {
        let Some(channel) = self.channels.get(community.id) else {
            tracing::info!(community = %community.name, "no welcome channel set");
            return Ok(DeliveryOutcome::NoChannel);
        };
        match transport.channel_permissions(channel).await? {
            None => {
                tracing::error!(%channel, community = %community.name, "welcome channel not found");
                Ok(DeliveryOutcome::ChannelMissing(channel))
            }
            Some(perms) if !perms.can_greet() => {
                tracing::error!(%channel, ?perms, "missing permissions in welcome channel");
                Ok(DeliveryOutcome::MissingPermissions(channel))
            }
            Some(_) => self.deliver_welcome(transport, channel, community, member).await,
        }
    }

    /// Greet `member` in the configured channel without a permission check (admin test command).
    pub async fn test_welcome(
        &self,
        transport: &dyn GreetingTransport,
        community: &Community,
        member: &Member,
    ) -> TypebannerResult<DeliveryOutcome> {
        match self.channels.get(community.id) {
            Some(channel) => {
                self.deliver_welcome(transport, channel, community, member)
                    .await
            }
            None => Ok(DeliveryOutcome::NoChannel),
        }
    }

    /// Render and post the welcome video, falling back to a text greeting on any failure.
    ///
    /// Only fails when even the text greeting cannot be posted.
    pub async fn deliver_welcome(
        &self,
        transport: &dyn GreetingTransport,
        channel: ChannelId,
        community: &Community,
        member: &Member,
    ) -> TypebannerResult<DeliveryOutcome> {
        tracing::info!(member = %member.display_name, %channel, "creating welcome video");

        let (scratch, video) = match self.generate(member).await {
            Ok(ok) => ok,
            Err(err) => {
                tracing::error!(member = %member.display_name, error = %err, "welcome video failed");
                let reason = FallbackReason::GenerationFailed(err.to_string());
                return send_fallback(transport, channel, &fallback_text(member, community), reason)
                    .await;
            }
        };

        let size = match tokio::fs::metadata(&video).await {
            Ok(meta) => meta.len(),
            Err(err) => {
                let reason = FallbackReason::GenerationFailed(format!(
                    "video missing after render: {err}"
                ));
                return send_fallback(transport, channel, &fallback_text(member, community), reason)
                    .await;
            }
        };
        tracing::info!(bytes = size, "welcome video created");

        let limit = self.config.attachment_limit_bytes;
        if size > limit {
            tracing::warn!(bytes = size, limit, "welcome video too large");
            let reason = FallbackReason::TooLarge { size, limit };
            return send_fallback(transport, channel, &too_large_text(member), reason).await;
        }

        let embed = GreetingEmbed::for_member(member, community);
        let outcome = match transport
            .send_video(channel, &video, &attachment_name(member), &embed)
            .await
        {
            Ok(()) => {
                tracing::info!(member = %member.display_name, "welcome video sent");
                Ok(DeliveryOutcome::Video { bytes: size })
            }
            Err(err) => {
                tracing::error!(error = %err, "welcome video upload failed");
                let reason = FallbackReason::SendFailed(err.to_string());
                send_fallback(transport, channel, &fallback_text(member, community), reason).await
            }
        };
        drop(scratch);
        outcome
    }

    async fn generate(&self, member: &Member) -> TypebannerResult<(tempfile::TempDir, PathBuf)> {
        let scratch = tempfile::Builder::new()
            .prefix("typebanner-welcome-")
            .tempdir()
            .map_err(|e| TypebannerError::delivery(format!("create scratch dir: {e}")))?;
        let out = scratch.path().join(format!("welcome_{}.mp4", member.id));

        let generator = Arc::clone(&self.generator);
        let name = member.display_name.clone();
        let video = tokio::task::spawn_blocking(move || generator.generate(&name, &out))
            .await
            .map_err(|e| TypebannerError::delivery(format!("render worker failed: {e}")))??;
        Ok((scratch, video))
    }
}

async fn send_fallback(
    transport: &dyn GreetingTransport,
    channel: ChannelId,
    text: &str,
    reason: FallbackReason,
) -> TypebannerResult<DeliveryOutcome> {
    transport.send_text(channel, text).await.map_err(|e| {
        tracing::error!(error = %e, "fallback greeting failed");
        TypebannerError::delivery(format!("text greeting failed: {e}"))
    })?;
    Ok(DeliveryOutcome::TextFallback { reason })
}

#[cfg(test)]
#[path = "../../tests/unit/welcome/delivery.rs"]
mod tests;
