//! 表名与列名约定
//!
//! 实体表为 `tc_<复数>`；权限关联表为 `tc_<owner>_<target>`，列为 `<owner>id` / `<target>id`。
//! 被管理用户关联存放在 `tc_user_user`，目标列为 `manageduserid`。

use fleet_ports::EntityKind;

pub(crate) fn table_name(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Server => "tc_servers",
        EntityKind::User | EntityKind::ManagedUser => "tc_users",
        EntityKind::Device => "tc_devices",
        EntityKind::Group => "tc_groups",
        EntityKind::Calendar => "tc_calendars",
        EntityKind::Command => "tc_commands",
        EntityKind::Geofence => "tc_geofences",
        EntityKind::Driver => "tc_drivers",
        EntityKind::Notification => "tc_notifications",
        EntityKind::Maintenance => "tc_maintenances",
        EntityKind::Attribute => "tc_attributes",
    }
}

fn link_key(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Server => "server",
        EntityKind::User | EntityKind::ManagedUser => "user",
        EntityKind::Device => "device",
        EntityKind::Group => "group",
        EntityKind::Calendar => "calendar",
        EntityKind::Command => "command",
        EntityKind::Geofence => "geofence",
        EntityKind::Driver => "driver",
        EntityKind::Notification => "notification",
        EntityKind::Maintenance => "maintenance",
        EntityKind::Attribute => "attribute",
    }
}

pub(crate) fn link_table(owner: EntityKind, target: EntityKind) -> String {
    format!("tc_{}_{}", link_key(owner), link_key(target))
}

pub(crate) fn link_column(kind: EntityKind) -> String {
    match kind {
        EntityKind::ManagedUser => "manageduserid".to_string(),
        other => format!("{}id", link_key(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_naming() {
        assert_eq!(link_table(EntityKind::User, EntityKind::Device), "tc_user_device");
        assert_eq!(link_column(EntityKind::User), "userid");
        assert_eq!(link_column(EntityKind::Device), "deviceid");
    }

    #[test]
    fn test_managed_user_naming() {
        assert_eq!(
            link_table(EntityKind::User, EntityKind::ManagedUser),
            "tc_user_user"
        );
        assert_eq!(link_column(EntityKind::ManagedUser), "manageduserid");
        assert_eq!(table_name(EntityKind::ManagedUser), "tc_users");
    }
}
