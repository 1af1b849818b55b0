//! Reference templates for the viewer/region datagram protocol.
//!
//! A small, faithful subset of the protocol's message catalog, used by the
//! codec's integration tests and as the CLI's built-in catalog.

use template::{
    BlockDef, FieldDef, FieldKind, Template, TemplateCatalog, TemplateResult, WireId,
};

fn agent_data() -> BlockDef {
    BlockDef::single("AgentData")
        .field("AgentID", FieldKind::Uuid)
        .field("SessionID", FieldKind::Uuid)
}

/// Returns the reference templates in declaration order.
#[must_use]
pub fn demo_templates() -> Vec<Template> {
    vec![
        Template::new("StartPingCheck", WireId::high(1)).block(
            BlockDef::single("PingID")
                .field("PingID", FieldKind::U8)
                .field("OldestUnacked", FieldKind::U32),
        ),
        Template::new("CompletePingCheck", WireId::high(2))
            .block(BlockDef::single("PingID").field("PingID", FieldKind::U8)),
        Template::new("AgentUpdate", WireId::high(4))
            .zero_coded()
            .block(
                agent_data()
                    .field("BodyRotation", FieldKind::Quaternion)
                    .field("HeadRotation", FieldKind::Quaternion)
                    .field("State", FieldKind::U8)
                    .field("CameraCenter", FieldKind::Vector3)
                    .field("CameraAtAxis", FieldKind::Vector3)
                    .field("CameraLeftAxis", FieldKind::Vector3)
                    .field("CameraUpAxis", FieldKind::Vector3)
                    .field("Far", FieldKind::F32)
                    .field("ControlFlags", FieldKind::U32)
                    .field("Flags", FieldKind::U8),
            ),
        Template::new("ViewerEffect", WireId::medium(17))
            .zero_coded()
            .block(agent_data())
            .block(
                BlockDef::variable("Effect")
                    .field("ID", FieldKind::Uuid)
                    .field("AgentID", FieldKind::Uuid)
                    .field("Type", FieldKind::U8)
                    .field("Duration", FieldKind::F32)
                    .with_field(FieldDef::fixed("Color", 4))
                    .with_field(FieldDef::variable1("TypeData")),
            ),
        Template::new("TestMessage", WireId::low(1))
            .zero_coded()
            .block(BlockDef::single("TestBlock1").field("Test1", FieldKind::U32))
            .block(
                BlockDef::multiple("NeighborBlock", 4)
                    .field("Test0", FieldKind::U32)
                    .field("Test1", FieldKind::U32)
                    .field("Test2", FieldKind::U32),
            ),
        Template::new("UseCircuitCode", WireId::low(3)).block(
            BlockDef::single("CircuitCode")
                .field("Code", FieldKind::U32)
                .field("SessionID", FieldKind::Uuid)
                .field("ID", FieldKind::Uuid),
        ),
        Template::new("TeleportLocationRequest", WireId::low(63))
            .block(agent_data())
            .block(
                BlockDef::single("Info")
                    .field("RegionHandle", FieldKind::U64)
                    .field("Position", FieldKind::Vector3)
                    .field("LookAt", FieldKind::Vector3),
            ),
        Template::new("ChatFromViewer", WireId::low(80))
            .zero_coded()
            .block(agent_data())
            .block(
                BlockDef::single("ChatData")
                    .with_field(FieldDef::variable2("Message"))
                    .field("Type", FieldKind::U8)
                    .field("Channel", FieldKind::S32),
            ),
        Template::new("ObjectLink", WireId::low(123))
            .zero_coded()
            .block(agent_data())
            .block(BlockDef::variable("ObjectData").field("ObjectLocalID", FieldKind::U32)),
        Template::new("ChatFromSimulator", WireId::low(139))
            .trusted()
            .block(
                BlockDef::single("ChatData")
                    .with_field(FieldDef::variable1("FromName"))
                    .field("SourceID", FieldKind::Uuid)
                    .field("OwnerID", FieldKind::Uuid)
                    .field("SourceType", FieldKind::U8)
                    .field("ChatType", FieldKind::U8)
                    .field("Audible", FieldKind::U8)
                    .field("Position", FieldKind::Vector3)
                    .with_field(FieldDef::variable2("Message")),
            ),
        Template::new("EnableSimulator", WireId::low(151))
            .trusted()
            .block(
                BlockDef::single("SimulatorInfo")
                    .field("Handle", FieldKind::U64)
                    .field("IP", FieldKind::IpAddr)
                    .field("Port", FieldKind::IpPort),
            ),
        Template::new("AgentMovementComplete", WireId::low(250))
            .trusted()
            .block(agent_data())
            .block(
                BlockDef::single("Data")
                    .field("Position", FieldKind::Vector3)
                    .field("LookAt", FieldKind::Vector3)
                    .field("RegionHandle", FieldKind::U64)
                    .field("Timestamp", FieldKind::U32),
            )
            .block(BlockDef::single("SimData").with_field(FieldDef::variable2("ChannelVersion"))),
        Template::new("PacketAck", WireId::fixed(0xFB))
            .block(BlockDef::variable("Packets").field("ID", FieldKind::U32)),
    ]
}

/// Builds the reference catalog.
pub fn demo_catalog() -> TemplateResult<TemplateCatalog> {
    TemplateCatalog::new(demo_templates())
}
