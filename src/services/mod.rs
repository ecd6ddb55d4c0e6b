/*
 * Responsibility
 * - 業務ロジック側のサービス (ここでは認証ゲートのみ)
 */
pub mod auth;
