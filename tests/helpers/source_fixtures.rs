//! Go sources used across the integration tests.

/// Import path of the generated wire-schema package
pub const PB_IMPORT_PATH: &str = "example.com/gen/pb";

/// Service package: interface, domain requests/responses, implementation
pub const SERVICE_SOURCE: &str = r#"package svc

import (
	"context"

	"example.com/gen/pb"
)

type Service interface {
	Do(ctx context.Context, req *DoRequest) (*DoResponse, error)
	List(ctx context.Context, req ListRequest) (ListResponse, error)
	Ping(ctx context.Context) error
}

type DoRequest struct {
	Name   string
	Limit  *int
	Status Status
	Item   *pb.Item
}

type DoResponse struct {
	Code  int
	Items []*Item
	Err   string
}

type ListRequest struct {
	Filter pb.Filter
}

type ListResponse struct {
	Total int64
}

type Item struct {
	V int32
}

type Status int32

type service struct{}

func (s *service) Do(ctx context.Context, req *DoRequest) (*DoResponse, error) {
	return &DoResponse{}, nil
}

func (s *service) List(ctx context.Context, req ListRequest) (ListResponse, error) {
	return ListResponse{}, nil
}

func (s *service) Ping(ctx context.Context) error { return nil }
"#;

/// Wire-schema package as protoc would generate it
pub const PB_SOURCE: &str = r#"package pb

type DoRequest struct {
	Name             string `protobuf:"bytes,1,opt,name=name" json:"name,omitempty"`
	Limit            int64  `protobuf:"varint,2,opt,name=limit" json:"limit,omitempty"`
	Status           Status `protobuf:"varint,3,opt,name=status" json:"status,omitempty"`
	XXX_unrecognized []byte `json:"-"`
}

type DoResponse struct {
	Code  int64
	Items []*Item
	Err   string
}

type Item struct {
	V int64
}

type Filter struct {
	Prefix string
}

type Status int32
"#;

/// Second file of the wire-schema package
pub const PB_EXTRA_SOURCE: &str = r#"package pb

type Page struct {
	Offset int32
	Size   int32
}
"#;

/// Structs annotated with wire directives
pub const TAGGED_SOURCE: &str = r#"package svc

type User struct {
	ID    int64    `json:"id" pb:"name=user_id,seq=1"`
	Name  string   `json:"name" pb:"seq=2"`
	Roles []string `pb:"seq=5"`
	Level Level    `pb:"seq=3,type=sint32"`
}

type Level int8

type Conflicting struct {
	A string `pb:"seq=1"`
	B string `pb:"seq=1"`
}
"#;
