//! 頁首導覽狀態：登入使用者可開啟的頁面、目前頁面、手機選單與發佈表單開關

use crate::utils::error::{ListingError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    #[default]
    Home,
    Profile,
    Admin,
}

impl Page {
    pub fn label(&self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::Profile => "Profil Saya",
            Page::Admin => "Panel Admin",
        }
    }

    /// 手機分頁列用的短標籤
    pub fn tab_label(&self) -> &'static str {
        match self {
            Page::Admin => "Admin",
            other => other.label(),
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = match self {
            Page::Home => "home",
            Page::Profile => "profile",
            Page::Admin => "admin",
        };
        f.write_str(key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    #[default]
    #[serde(other)]
    Member,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub role: UserRole,
}

impl SessionUser {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// 未登入時不顯示頁首
pub fn header_visible(user: Option<&SessionUser>) -> bool {
    user.is_some()
}

pub fn visible_destinations(user: &SessionUser) -> Vec<Page> {
    let mut pages = vec![Page::Home, Page::Profile];
    if user.is_admin() {
        pages.push(Page::Admin);
    }
    pages
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationState {
    current_page: Page,
    mobile_menu_open: bool,
    post_form_open: bool,
}

impl NavigationState {
    pub fn current_page(&self) -> Page {
        self.current_page
    }

    pub fn is_active(&self, page: Page) -> bool {
        self.current_page == page
    }

    pub fn is_mobile_menu_open(&self) -> bool {
        self.mobile_menu_open
    }

    pub fn is_post_form_open(&self) -> bool {
        self.post_form_open
    }

    /// 切換頁面並關閉手機選單；使用者看不到的頁面會被拒絕
    pub fn navigate(&mut self, page: Page, user: &SessionUser) -> Result<()> {
        if !visible_destinations(user).contains(&page) {
            tracing::warn!(user_id = %user.id, page = %page, "Navigation refused");
            return Err(ListingError::ForbiddenNavigation {
                page: page.to_string(),
                role: format!("{:?}", user.role).to_lowercase(),
            });
        }
        self.current_page = page;
        self.mobile_menu_open = false;
        Ok(())
    }

    pub fn toggle_mobile_menu(&mut self) {
        self.mobile_menu_open = !self.mobile_menu_open;
    }

    pub fn open_post_form(&mut self) {
        self.post_form_open = true;
        self.mobile_menu_open = false;
    }

    pub fn close_post_form(&mut self) {
        self.post_form_open = false;
    }

    /// 登出後回到首頁
    pub fn sign_out(&mut self) {
        *self = Self::default();
    }
}
